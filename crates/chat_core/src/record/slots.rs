use serde::{Deserialize, Serialize};

use crate::branch::Branch;

/// The two response texts of a record, indexed by [`Branch::slot`].
///
/// An empty string means the branch has not answered or failed. The wire
/// form is a plain array; short arrays are padded and extra entries dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ResponseSlots([String; 2]);

impl ResponseSlots {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self([left.into(), right.into()])
    }

    pub fn get(&self, branch: Branch) -> &str {
        &self.0[branch.slot()]
    }

    pub fn set(&mut self, branch: Branch, text: impl Into<String>) {
        self.0[branch.slot()] = text.into();
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(String::is_empty)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.to_vec()
    }
}

impl From<Vec<String>> for ResponseSlots {
    fn from(values: Vec<String>) -> Self {
        let mut iter = values.into_iter();
        let left = iter.next().unwrap_or_default();
        let right = iter.next().unwrap_or_default();
        Self([left, right])
    }
}

impl From<ResponseSlots> for Vec<String> {
    fn from(slots: ResponseSlots) -> Self {
        let [left, right] = slots.0;
        vec![left, right]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_arrays_are_padded() {
        let slots: ResponseSlots = serde_json::from_str(r#"["only left"]"#).unwrap();
        assert_eq!(slots.get(Branch::Left), "only left");
        assert_eq!(slots.get(Branch::Right), "");
    }

    #[test]
    fn extra_entries_are_dropped() {
        let slots: ResponseSlots = serde_json::from_str(r#"["a", "b", "c"]"#).unwrap();
        assert_eq!(slots, ResponseSlots::new("a", "b"));
        assert_eq!(serde_json::to_string(&slots).unwrap(), r#"["a","b"]"#);
    }

    #[test]
    fn set_addresses_fixed_slot() {
        let mut slots = ResponseSlots::default();
        assert!(slots.is_empty());
        slots.set(Branch::Right, "right answer");
        assert_eq!(slots.to_vec(), vec!["".to_string(), "right answer".to_string()]);
    }
}
