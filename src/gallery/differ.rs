use crate::state::data::Entry;

/// Two views are the same when they list the same names in the same order.
///
/// Flags are ignored: within one catalog a name always carries the same flags.
pub fn same_entries(a: &[Entry], b: &[Entry]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.name == y.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(names: &[&str]) -> Vec<Entry> {
        names
            .iter()
            .map(|n| Entry::new(*n, false, false, false))
            .collect()
    }

    #[test]
    fn test_reflexive() {
        let v = entries(&["a.png", "b.png"]);
        assert!(same_entries(&v, &v));
        assert!(same_entries(&[], &[]));
    }

    #[test]
    fn test_symmetric() {
        let a = entries(&["a.png", "b.png"]);
        let b = entries(&["a.png", "c.png"]);
        assert_eq!(same_entries(&a, &b), same_entries(&b, &a));
    }

    #[test]
    fn test_length_mismatch() {
        let a = entries(&["a.png", "b.png"]);
        let b = entries(&["a.png"]);
        assert!(!same_entries(&a, &b));
    }

    #[test]
    fn test_name_mismatch_or_order() {
        let a = entries(&["a.png", "b.png"]);
        assert!(!same_entries(&a, &entries(&["a.png", "c.png"])));
        assert!(!same_entries(&a, &entries(&["b.png", "a.png"])));
    }

    #[test]
    fn test_flags_ignored() {
        let a = vec![Entry::new("a.png", true, true, true)];
        let b = vec![Entry::new("a.png", false, false, false)];
        assert!(same_entries(&a, &b));
    }
}
