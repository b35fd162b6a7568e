//! Catalog loaders: RON files in, validated oracle implementations out.

use std::collections::HashMap;
use std::path::Path;

use battle_core::{
    CatalogOracle, CrowdControlKind, UltimateDef, UltimateShape, UnitId, UnitTags, UnitTemplate,
};

use crate::formats::{UltimateSpec, UnitSpec};

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Validated unit template catalog.
///
/// Structural file errors (unreadable, unparsable RON) fail the load;
/// per-entry shape problems degrade that entry's ultimate to `Inert` and
/// are recorded in [`UnitCatalog::warnings`], so one bad definition never
/// stops a battle.
#[derive(Clone, Debug, Default)]
pub struct UnitCatalog {
    templates: HashMap<UnitId, UnitTemplate>,
    warnings: Vec<String>,
}

impl UnitCatalog {
    /// Loads the built-in starter catalog embedded in this crate.
    pub fn builtin() -> LoadResult<Self> {
        Self::load_str(include_str!("../data/units.ron"))
    }

    /// Loads a catalog from a RON file on disk.
    pub fn load_path(path: &Path) -> LoadResult<Self> {
        Self::load_str(&read_file(path)?)
    }

    /// Loads a catalog from RON text.
    pub fn load_str(source: &str) -> LoadResult<Self> {
        let specs: Vec<UnitSpec> = ron::from_str(source)
            .map_err(|e| anyhow::anyhow!("Failed to parse unit catalog: {}", e))?;

        let mut catalog = Self::default();
        for spec in specs {
            let (template, warning) = convert_unit(&spec);
            if let Some(warning) = warning {
                catalog.warnings.push(warning);
            }
            catalog.templates.insert(template.id, template);
        }
        Ok(catalog)
    }

    pub fn get(&self, id: UnitId) -> Option<&UnitTemplate> {
        self.templates.get(&id)
    }

    /// Load-time validation warnings (entries degraded to `Inert`).
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.templates.keys().copied()
    }
}

impl CatalogOracle for UnitCatalog {
    fn unit_template(&self, id: UnitId) -> Option<&UnitTemplate> {
        self.templates.get(&id)
    }
}

fn convert_unit(spec: &UnitSpec) -> (UnitTemplate, Option<String>) {
    let mut tags = UnitTags::empty();
    if spec.leader {
        tags |= UnitTags::LEADER;
    }
    if spec.boss {
        tags |= UnitTags::BOSS;
    }

    let mut warning = None;
    let ultimate = match &spec.ultimate {
        None => UltimateDef::inert(),
        Some(ult) => match resolve_shape(ult) {
            Ok(shape) => UltimateDef {
                name: ult.name.clone(),
                cost: ult.cost,
                shape,
                busy_ms: ult.busy_ms,
            },
            Err(problem) => {
                warning = Some(format!(
                    "unit {} '{}': ultimate '{}' degraded to inert: {}",
                    spec.id, spec.name, ult.name, problem
                ));
                UltimateDef {
                    name: ult.name.clone(),
                    cost: ult.cost,
                    shape: UltimateShape::Inert,
                    busy_ms: ult.busy_ms,
                }
            }
        },
    };

    let template = UnitTemplate::new(UnitId(spec.id), spec.name.clone(), spec.hp_max, spec.attack)
        .with_fury_max(spec.fury_max)
        .with_follow_up_hits(spec.follow_up_hits)
        .with_regen(spec.hp_regen, spec.fury_regen)
        .with_tags(tags)
        .with_ultimate(ultimate);

    (template, warning)
}

/// Resolves a string shape tag into the closed engine union. Unknown tags
/// and missing parameters are per-entry errors the caller degrades.
fn resolve_shape(spec: &UltimateSpec) -> Result<UltimateShape, String> {
    fn require<T: Copy>(value: Option<T>, name: &str) -> Result<T, String> {
        value.ok_or_else(|| format!("missing parameter '{}'", name))
    }

    match spec.shape.as_str() {
        "burst" => Ok(UltimateShape::Burst {
            targets: require(spec.targets, "targets")?,
            power_pct: require(spec.power_pct, "power_pct")?,
        }),
        "drain" => Ok(UltimateShape::Drain {
            power_pct: require(spec.power_pct, "power_pct")?,
            leech_pct: require(spec.leech_pct, "leech_pct")?,
        }),
        "lane_sweep" => Ok(UltimateShape::LaneSweep {
            hits: require(spec.hits, "hits")?,
            power_pct: require(spec.power_pct, "power_pct")?,
        }),
        "overload" => Ok(UltimateShape::Overload {
            hp_cost_pct: require(spec.hp_cost_pct, "hp_cost_pct")?,
            attack_up_pct: require(spec.attack_up_pct, "attack_up_pct")?,
            duration: require(spec.duration, "duration")?,
        }),
        "crowd_control" => {
            let effect = match spec.effect.as_deref() {
                Some("sleep") => CrowdControlKind::Sleep,
                Some("haste") => CrowdControlKind::Haste,
                Some(other) => return Err(format!("unknown crowd-control effect '{}'", other)),
                None => return Err("missing parameter 'effect'".to_string()),
            };
            Ok(UltimateShape::CrowdControl {
                effect,
                targets: require(spec.targets, "targets")?,
                duration: require(spec.duration, "duration")?,
            })
        }
        "revive" => Ok(UltimateShape::Revive {
            hp_pct: require(spec.hp_pct, "hp_pct")?,
            fury: spec.fury.unwrap_or(0),
            fury_locked: spec.fury_locked.unwrap_or(false),
        }),
        "equalize_hp" => Ok(UltimateShape::EqualizeHp),
        "summon_pack" => Ok(UltimateShape::SummonPack {
            unit: UnitId(require(spec.unit, "unit")?),
            count: require(spec.count, "count")?,
            inherit_pct: require(spec.inherit_pct, "inherit_pct")?,
            lifetime: require(spec.lifetime, "lifetime")?,
        }),
        other => Err(format!("unknown shape '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_catalog_loads_cleanly() {
        let catalog = UnitCatalog::builtin().expect("builtin catalog should parse");
        assert!(!catalog.is_empty());
        assert!(
            catalog.warnings().is_empty(),
            "builtin data must validate: {:?}",
            catalog.warnings()
        );
    }

    #[test]
    fn unknown_shape_degrades_to_inert_with_warning() {
        let source = r#"#![enable(implicit_some)]
        [
            (
                id: 9,
                name: "Glitch",
                hp_max: 100,
                attack: 10,
                ultimate: (
                    name: "Garbage",
                    cost: 50,
                    shape: "does_not_exist",
                ),
            ),
        ]"#;
        let catalog = UnitCatalog::load_str(source).unwrap();
        assert_eq!(catalog.warnings().len(), 1);
        let template = catalog.get(UnitId(9)).unwrap();
        assert_eq!(template.ultimate.shape, UltimateShape::Inert);
        // The cost survives: a degraded cast still spends its fury.
        assert_eq!(template.ultimate.cost, 50);
    }

    #[test]
    fn missing_parameter_degrades_to_inert() {
        let source = r#"#![enable(implicit_some)]
        [
            (
                id: 10,
                name: "Halfling",
                hp_max: 100,
                attack: 10,
                ultimate: (
                    name: "Halfcast",
                    cost: 40,
                    shape: "burst",
                    targets: 2,
                ),
            ),
        ]"#;
        let catalog = UnitCatalog::load_str(source).unwrap();
        assert_eq!(catalog.warnings().len(), 1);
        assert!(catalog.warnings()[0].contains("power_pct"));
        assert_eq!(
            catalog.get(UnitId(10)).unwrap().ultimate.shape,
            UltimateShape::Inert
        );
    }

    #[test]
    fn load_path_reads_ron_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[(id: 3, name: "Scout", hp_max: 250, attack: 40)]"#
        )
        .unwrap();
        let catalog = UnitCatalog::load_path(file.path()).unwrap();
        let template = catalog.get(UnitId(3)).unwrap();
        assert_eq!(template.name, "Scout");
        assert_eq!(template.hp_max, 250);
        // No ultimate entry: the unreachable-cost placeholder.
        assert_eq!(template.ultimate.shape, UltimateShape::Inert);
        assert_eq!(template.ultimate.cost, u32::MAX);
    }

    #[test]
    fn structural_errors_fail_the_load() {
        assert!(UnitCatalog::load_str("this is not ron").is_err());
    }
}
