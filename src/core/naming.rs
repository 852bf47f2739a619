use crate::prelude::*;
use indexmap::IndexMap;

/// Mapping from molecule pattern to molecule name.
///
/// Patterns are kept in the order they were first encountered. This mapping
/// is the only source of names for the molecules of a [ParticleSystem].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UniqueMolecules(IndexMap<String, String>);

impl UniqueMolecules {
    /// Assigns `molecule0`, `molecule1`, ... to distinct patterns of
    /// `molecules` in first-seen order.
    pub fn from_molecules(molecules: &[Molecule]) -> Self {
        let mut map = IndexMap::new();
        for m in molecules {
            if !map.contains_key(m.pattern()) {
                let name = format!("molecule{}", map.len());
                map.insert(m.pattern().to_owned(), name);
            }
        }
        Self(map)
    }

    /// Adds or overwrites pattern to name entries.
    pub fn merge<K, V>(&mut self, entries: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (pattern, name) in entries {
            self.0.insert(pattern.into(), name.into());
        }
    }

    pub fn get(&self, pattern: &str) -> Option<&str> {
        self.0.get(pattern).map(|s| s.as_str())
    }

    pub fn contains_key(&self, pattern: &str) -> bool {
        self.0.contains_key(pattern)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(pattern, name)` pairs
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn patterns(&self) -> impl ExactSizeIterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }
}

impl std::ops::Index<&str> for UniqueMolecules {
    type Output = str;
    fn index(&self, pattern: &str) -> &Self::Output {
        &self.0[pattern]
    }
}

/// Gives each molecule the name registered for its pattern.
/// Molecules with unknown patterns keep their current name.
pub fn apply_names(molecules: &mut [Molecule], names: &UniqueMolecules) {
    for m in molecules.iter_mut() {
        if let Some(name) = names.get(m.pattern()) {
            m.set_name(name);
        }
    }
}

/// Builds the pattern to name mapping for `molecules` and names them.
pub fn assign_names(molecules: &mut [Molecule]) -> UniqueMolecules {
    let names = UniqueMolecules::from_molecules(molecules);
    apply_names(molecules, &names);
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mol(particles: &[(usize, &str)]) -> Molecule {
        let mut m = Molecule::new();
        for (i, t) in particles {
            m.add_particle(*i, t);
        }
        m
    }

    #[test]
    fn first_seen_order() {
        let mut mols = vec![
            mol(&[(0, "A"), (1, "B")]),
            mol(&[(2, "W")]),
            mol(&[(3, "A"), (4, "B")]),
            mol(&[(5, "W")]),
        ];
        let names = assign_names(&mut mols);
        assert_eq!(names.len(), 2);
        assert_eq!(names.patterns().collect::<Vec<_>>(), vec!["AB", "W"]);
        assert_eq!(&names["AB"], "molecule0");
        assert_eq!(names.get("W"), Some("molecule1"));
        let got: Vec<_> = mols.iter().map(|m| m.name()).collect();
        assert_eq!(got, vec!["molecule0", "molecule1", "molecule0", "molecule1"]);
    }

    #[test]
    fn merge_keeps_untouched_names() {
        let mut mols = vec![mol(&[(0, "A")]), mol(&[(1, "B")])];
        let mut names = assign_names(&mut mols);
        names.merge([("B", "beta"), ("Z", "zeta")]);
        apply_names(&mut mols, &names);

        assert_eq!(mols[0].name(), "molecule0");
        assert_eq!(mols[1].name(), "beta");
        assert_eq!(names.len(), 3);
        // Overwritten entry keeps its position
        assert_eq!(names.iter().nth(1), Some(("B", "beta")));
    }
}
