//! Entity type configuration and per-map entity planning

use crate::{CompileError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tilebin_core::Entity;
use tilebin_layout::LayoutError;
use tracing::{debug, warn};

/// Entity type names known to the game.
///
/// ```toml
/// entity_types = ["door", "goal", "spawn"]
/// indexed_entity_types = ["door"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityTypes {
    /// Ordered type names; an entity's type code is its 1-based position
    pub entity_types: Vec<String>,
    /// Types whose entities receive a world-unique sequential id
    pub indexed_entity_types: Vec<String>,
}

impl EntityTypes {
    pub fn new(entity_types: Vec<String>, indexed_entity_types: Vec<String>) -> Self {
        Self {
            entity_types,
            indexed_entity_types,
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// 1-based position of the type, 0 when untyped or unknown
    pub fn type_code(&self, entity_type: Option<&str>) -> u16 {
        let Some(name) = entity_type else {
            return 0;
        };
        match self.entity_types.iter().position(|t| t == name) {
            Some(position) => u16::try_from(position + 1).unwrap_or(0),
            None => {
                warn!(entity_type = name, "entity type missing from configuration");
                0
            }
        }
    }

    pub fn is_indexed(&self, entity_type: Option<&str>) -> bool {
        entity_type.is_some_and(|name| self.indexed_entity_types.iter().any(|t| t == name))
    }
}

/// Entity indices of one map sorted by each edge of their extent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortOrders {
    pub x_min: Vec<u16>,
    pub x_max: Vec<u16>,
    pub y_min: Vec<u16>,
    pub y_max: Vec<u16>,
}

/// Derived entity data for one map, computed once before layout so both
/// passes write the same values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityPlan {
    pub type_codes: Vec<u16>,
    pub indexed_ids: Vec<u16>,
    pub orders: SortOrders,
}

/// Plans entities map by map, handing out indexed ids across the world
#[derive(Debug)]
pub struct EntityPlanner<'a> {
    types: &'a EntityTypes,
    next_id: u32,
}

impl<'a> EntityPlanner<'a> {
    pub fn new(types: &'a EntityTypes) -> Self {
        Self { types, next_id: 1 }
    }

    pub fn plan(&mut self, entities: &[Entity]) -> Result<EntityPlan> {
        let mut plan = EntityPlan::default();
        for entity in entities {
            let entity_type = entity.entity_type.as_deref();
            plan.type_codes.push(self.types.type_code(entity_type));
            let id = if self.types.is_indexed(entity_type) {
                self.allocate_id()?
            } else {
                0
            };
            plan.indexed_ids.push(id);
        }
        plan.orders = SortOrders {
            x_min: sort_order(entities, |e| u32::from(e.x))?,
            x_max: sort_order(entities, Entity::max_x)?,
            y_min: sort_order(entities, |e| u32::from(e.y))?,
            y_max: sort_order(entities, Entity::max_y)?,
        };
        debug!(entities = entities.len(), next_id = self.next_id, "planned entities");
        Ok(plan)
    }

    fn allocate_id(&mut self) -> Result<u16> {
        let id = u16::try_from(self.next_id).map_err(|_| CompileError::IndexedIdOverflow {
            max: usize::from(u16::MAX),
        })?;
        self.next_id += 1;
        Ok(id)
    }
}

/// Stable ordering of entity indices by `key`
fn sort_order(entities: &[Entity], key: impl Fn(&Entity) -> u32) -> Result<Vec<u16>> {
    let count = u16::try_from(entities.len()).map_err(|_| LayoutError::ValueOutOfRange {
        field: "entity_count",
        value: entities.len(),
    })?;
    let mut order: Vec<u16> = (0..count).collect();
    order.sort_by_key(|&i| key(&entities[usize::from(i)]));
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(x: u16) -> Entity {
        Entity::new(0, x, 0).with_type("goal")
    }

    fn types(entity_types: &[&str], indexed: &[&str]) -> EntityTypes {
        EntityTypes::new(
            entity_types.iter().map(|s| s.to_string()).collect(),
            indexed.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn test_indexed_ids_follow_input_order() {
        let types = types(&["goal"], &["goal"]);
        let plan = EntityPlanner::new(&types).plan(&[goal(5), goal(3)]).unwrap();
        assert_eq!(plan.orders.x_min, vec![1, 0]);
        assert_eq!(plan.indexed_ids, vec![1, 2]);
        assert_eq!(plan.type_codes, vec![1, 1]);
    }

    #[test]
    fn test_ids_shared_across_maps() {
        let types = types(&["spawn", "door"], &["door"]);
        let mut planner = EntityPlanner::new(&types);
        let door = Entity::new(0, 0, 0).with_type("door");
        let spawn = Entity::new(0, 0, 0).with_type("spawn");
        let first = planner.plan(&[door.clone(), spawn]).unwrap();
        let second = planner.plan(&[door]).unwrap();
        assert_eq!(first.indexed_ids, vec![1, 0]);
        assert_eq!(first.type_codes, vec![2, 1]);
        assert_eq!(second.indexed_ids, vec![2]);
    }

    #[test]
    fn test_unknown_and_untyped() {
        let types = types(&["goal"], &[]);
        assert_eq!(types.type_code(None), 0);
        assert_eq!(types.type_code(Some("lava")), 0);
        assert!(!types.is_indexed(Some("goal")));
    }

    #[test]
    fn test_sort_orders_are_stable() {
        let entities = vec![
            Entity::new(0, 4, 8).with_size(16, 16),
            Entity::new(0, 4, 0).with_size(4, 40),
            Entity::new(0, 0, 8).with_size(32, 16),
        ];
        let plan = EntityPlanner::new(&EntityTypes::default()).plan(&entities).unwrap();
        assert_eq!(plan.orders.x_min, vec![2, 0, 1]);
        assert_eq!(plan.orders.x_max, vec![1, 0, 2]);
        assert_eq!(plan.orders.y_min, vec![1, 0, 2]);
        assert_eq!(plan.orders.y_max, vec![0, 2, 1]);
    }

    #[test]
    fn test_indexed_id_overflow() {
        let types = types(&["goal"], &["goal"]);
        let mut planner = EntityPlanner::new(&types);
        planner.next_id = u32::from(u16::MAX);
        assert!(planner.plan(&[goal(0)]).is_ok());
        assert!(matches!(
            planner.plan(&[goal(0)]),
            Err(CompileError::IndexedIdOverflow { max: 65535 })
        ));
    }

    #[test]
    fn test_toml_config() {
        let types = EntityTypes::from_toml_str(
            r#"
            entity_types = ["door", "goal"]
            indexed_entity_types = ["door"]
            "#,
        )
        .unwrap();
        assert_eq!(types.type_code(Some("goal")), 2);
        assert!(types.is_indexed(Some("door")));

        let empty = EntityTypes::from_toml_str("").unwrap();
        assert_eq!(empty, EntityTypes::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("types.toml");
        std::fs::write(&path, "entity_types = [\"spawn\"]\n").unwrap();
        let types = EntityTypes::load(&path).unwrap();
        assert_eq!(types.entity_types, vec!["spawn".to_string()]);
        assert!(EntityTypes::load(dir.path().join("missing.toml")).is_err());
    }
}
