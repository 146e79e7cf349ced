use std::collections::HashMap;

use morris_core::{ConfigError, GroupId, Parameter, ParameterSpace};

use super::screening_data::ParameterData;

/// Assigns group ids to group names in order of first appearance
#[derive(Debug, Default)]
struct GroupResolver {
    ids: HashMap<String, GroupId>,
    next: u32,
}

impl GroupResolver {
    fn fresh(&mut self) -> GroupId {
        let id = GroupId(self.next);
        self.next += 1;
        id
    }

    fn resolve(&mut self, name: Option<&str>) -> GroupId {
        match name {
            None => self.fresh(),
            Some(name) => {
                if let Some(&id) = self.ids.get(name) {
                    return id;
                }
                let id = self.fresh();
                self.ids.insert(name.to_string(), id);
                id
            }
        }
    }
}

/// Convert parameter entries (human-readable YAML) to a validated parameter space
pub fn to_parameter_space(parameters: &[ParameterData]) -> Result<ParameterSpace, ConfigError> {
    let mut groups = GroupResolver::default();
    let parameters = parameters
        .iter()
        .map(|p| {
            Parameter::new(
                p.name.clone(),
                p.lower,
                p.upper,
                p.levels,
                groups.resolve(p.group.as_deref()),
            )
        })
        .collect();
    ParameterSpace::new(parameters)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, group: Option<&str>) -> ParameterData {
        ParameterData {
            name: name.to_string(),
            lower: 0.0,
            upper: 1.0,
            levels: 4,
            group: group.map(str::to_string),
        }
    }

    #[test]
    fn test_group_names_resolve_in_first_appearance_order() {
        let space = to_parameter_space(&[
            param("a", Some("costs")),
            param("b", None),
            param("c", Some("costs")),
            param("d", Some("demand")),
        ])
        .unwrap();

        assert_eq!(space.groups(), &[GroupId(0), GroupId(1), GroupId(2)]);
        assert_eq!(space.members(GroupId(0)), Some(&[0, 2][..]));
        assert_eq!(
            space.member_names(),
            vec![vec!["a", "c"], vec!["b"], vec!["d"]]
        );
    }

    #[test]
    fn test_invalid_parameter_reported() {
        let mut bad = param("a", None);
        bad.levels = 1;
        assert_eq!(
            to_parameter_space(&[bad]).unwrap_err(),
            ConfigError::TooFewLevels { index: 0, levels: 1 }
        );
    }
}
