use crate::ipc::Side;
use std::collections::HashMap;

/// A window placed into a group during the current pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember {
    /// Live address; `None` for a window launched this pass that has not
    /// been observed yet
    pub address: Option<String>,
    pub x: i32,
}

impl GroupMember {
    pub fn live(address: impl Into<String>, x: i32) -> Self {
        Self {
            address: Some(address.into()),
            x,
        }
    }

    pub fn launched(x: i32) -> Self {
        Self { address: None, x }
    }
}

/// Pass-local bookkeeping of which windows were placed into which group.
///
/// Keys are the saved group keys; a key's member list only ever grows.
#[derive(Debug, Default)]
pub struct GroupTracker {
    groups: HashMap<String, Vec<GroupMember>>,
}

impl GroupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a member under `key`. Returns `false` when the key is new and
    /// a group has to be created, `true` when an existing group is joined.
    pub fn observe(&mut self, key: &str, member: GroupMember) -> bool {
        match self.groups.get_mut(key) {
            Some(members) => {
                members.push(member);
                true
            }
            None => {
                self.groups.insert(key.to_string(), vec![member]);
                false
            }
        }
    }

    pub fn member_count(&self, key: &str) -> usize {
        self.groups.get(key).map_or(0, Vec::len)
    }

    /// Direction from a candidate window to the group's base window
    pub fn side_of(&self, key: &str, candidate_x: i32) -> Option<Side> {
        let base = self.groups.get(key)?.first()?;
        if base.x >= candidate_x {
            Some(Side::Right)
        } else {
            Some(Side::Left)
        }
    }

    /// Live addresses collected for `key`, concatenated in placement order
    pub fn live_key(&self, key: &str) -> Option<String> {
        self.groups.get(key).map(|members| {
            members
                .iter()
                .filter_map(|member| member.address.as_deref())
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_observe_is_new_then_existing() {
        let mut tracker = GroupTracker::new();

        assert!(!tracker.observe("0xa0xb0xc", GroupMember::live("0x1", 0)));
        assert!(tracker.observe("0xa0xb0xc", GroupMember::live("0x2", 10)));
        assert!(tracker.observe("0xa0xb0xc", GroupMember::live("0x3", 20)));
        assert_eq!(tracker.member_count("0xa0xb0xc"), 3);

        // Independent keys do not interfere
        assert!(!tracker.observe("0xd0xe", GroupMember::live("0x4", 0)));
        assert_eq!(tracker.member_count("0xd0xe"), 1);
    }

    #[test]
    fn test_side_of_compares_against_base() {
        let mut tracker = GroupTracker::new();
        tracker.observe("g", GroupMember::live("0x1", 500));
        tracker.observe("g", GroupMember::live("0x2", 900));

        assert_eq!(tracker.side_of("g", 100), Some(Side::Right));
        assert_eq!(tracker.side_of("g", 500), Some(Side::Right));
        assert_eq!(tracker.side_of("g", 501), Some(Side::Left));
        assert_eq!(tracker.side_of("missing", 0), None);
    }

    #[test]
    fn test_live_key_skips_unobserved_launches() {
        let mut tracker = GroupTracker::new();
        tracker.observe("g", GroupMember::launched(0));
        tracker.observe("g", GroupMember::live("0x2", 0));
        tracker.observe("g", GroupMember::live("0x3", 0));

        assert_eq!(tracker.live_key("g").as_deref(), Some("0x20x3"));
        assert_eq!(tracker.member_count("g"), 3);
        assert_eq!(tracker.live_key("h"), None);
    }
}
