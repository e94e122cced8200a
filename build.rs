use time::format_description::{self, BorrowedFormatItem};
use time::OffsetDateTime;

/// Export `var` to the crate, taken from the environment or stamped from `now`.
fn stamp(var: &str, now: OffsetDateTime, format: &[BorrowedFormatItem<'_>]) {
    let value = std::env::var(var)
        .unwrap_or_else(|_| now.format(format).unwrap_or_else(|_| "unknown".to_string()));
    println!("cargo:rustc-env={var}={value}");
    println!("cargo:rerun-if-env-changed={var}");
}

fn main() {
    let now = OffsetDateTime::now_utc();
    let date = format_description::parse_borrowed::<2>("[year]-[month]-[day]").expect("valid date format");
    let time = format_description::parse_borrowed::<2>("[hour]:[minute]:[second]").expect("valid time format");

    stamp("BATCHMESH_BUILD_DATE", now, &date);
    stamp("BATCHMESH_BUILD_TIME", now, &time);
}
