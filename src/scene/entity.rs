//! Entity assembler - groups mesh ids into named entities.

use super::mesh::mesh_id;
use super::ranges::span;
use crate::core::EntityArrays;
use crate::util::{Error, Result};

/// One reconstructed entity. Meshes are referenced by id only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedEntity {
    pub id: String,
    /// Registered as a first-class object by the sink.
    pub is_object: bool,
    pub mesh_ids: Vec<String>,
}

/// Reassemble every entity of a container.
///
/// Entity `j` owns the contiguous mesh ordinals starting at
/// `mesh_offsets[j]`; the last entity runs to `num_meshes`.
pub fn assemble_entities(
    model_id: &str,
    arrays: &EntityArrays<'_>,
    num_meshes: usize,
) -> Result<Vec<DecodedEntity>> {
    let num_entities = arrays.num_entities();
    if arrays.is_object.len() != num_entities || arrays.mesh_offsets.len() != num_entities {
        return Err(Error::entity_segments(format!(
            "{num_entities} ids, {} is-object flags, {} mesh offsets",
            arrays.is_object.len(),
            arrays.mesh_offsets.len()
        )));
    }

    let mut entities = Vec::with_capacity(num_entities);
    for (j, id) in arrays.ids.iter().enumerate() {
        let range = span(&arrays.mesh_offsets, j, num_meshes).ok_or_else(|| {
            Error::entity_segments(format!(
                "entity {j} ('{id}'): mesh offset {} does not fit {num_meshes} meshes",
                arrays.mesh_offsets[j]
            ))
        })?;

        entities.push(DecodedEntity {
            id: id.clone(),
            is_object: arrays.is_object[j] != 0,
            mesh_ids: range.map(|k| mesh_id(model_id, k)).collect(),
        });
    }

    tracing::debug!(model_id, entities = entities.len(), "assembled entities");
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    fn arrays(ids: &[&str], is_object: Vec<u8>, mesh_offsets: Vec<u32>) -> EntityArrays<'static> {
        EntityArrays {
            mesh_ids: Cow::Owned(vec![]),
            ids: ids.iter().map(|s| s.to_string()).collect(),
            is_object: Cow::Owned(is_object),
            mesh_offsets: Cow::Owned(mesh_offsets),
        }
    }

    #[test]
    fn test_single_entity_takes_all_meshes() -> Result<()> {
        let entities = assemble_entities("M", &arrays(&["wall"], vec![1], vec![0]), 2)?;
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].mesh_ids, vec!["M.0".to_string(), "M.1".to_string()]);
        assert_eq!(entities[0].id, "wall");
        assert!(entities[0].is_object);
        Ok(())
    }

    #[test]
    fn test_ranges_and_flags() -> Result<()> {
        let entities = assemble_entities(
            "site",
            &arrays(&["a", "b", "c"], vec![0, 1, 255], vec![0, 2, 2]),
            5,
        )?;
        assert_eq!(entities[0].mesh_ids, vec!["site.0", "site.1"]);
        assert!(entities[1].mesh_ids.is_empty());
        assert_eq!(entities[2].mesh_ids, vec!["site.2", "site.3", "site.4"]);
        assert_eq!(
            entities.iter().map(|e| e.is_object).collect::<Vec<_>>(),
            vec![false, true, true]
        );
        Ok(())
    }

    #[test]
    fn test_ids_are_verbatim() -> Result<()> {
        let entities = assemble_entities("M", &arrays(&["2O2Fr$t4X7Zf8NOew3FLOH"], vec![1], vec![0]), 1)?;
        assert_eq!(entities[0].id, "2O2Fr$t4X7Zf8NOew3FLOH");
        Ok(())
    }

    #[test]
    fn test_length_mismatch() {
        let err = assemble_entities("M", &arrays(&["a", "b"], vec![1], vec![0, 1]), 2).unwrap_err();
        assert!(matches!(err, Error::InconsistentEntitySegments(_)));

        let err = assemble_entities("M", &arrays(&["a"], vec![1], vec![0, 1]), 2).unwrap_err();
        assert!(matches!(err, Error::InconsistentEntitySegments(_)));
    }

    #[test]
    fn test_offset_past_mesh_count() {
        let err = assemble_entities("M", &arrays(&["a", "b"], vec![1, 1], vec![0, 3]), 2).unwrap_err();
        assert!(err.to_string().contains("entity 0 ('a')"));

        let err = assemble_entities("M", &arrays(&["a", "b"], vec![1, 1], vec![2, 1]), 2).unwrap_err();
        assert!(matches!(err, Error::InconsistentEntitySegments(_)));
    }

    #[test]
    fn test_no_entities() -> Result<()> {
        assert!(assemble_entities("M", &arrays(&[], vec![], vec![]), 4)?.is_empty());
        Ok(())
    }
}
