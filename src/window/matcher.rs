use crate::ipc::WindowDescriptor;
use std::fmt;

/// Heuristic used to pair a saved window with a live one, in decreasing
/// order of confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchRule {
    InitialTitle,
    InitialClass,
    Class,
    ClassContains,
    Pid,
}

impl MatchRule {
    pub const PRIORITY: [MatchRule; 5] = [
        MatchRule::InitialTitle,
        MatchRule::InitialClass,
        MatchRule::Class,
        MatchRule::ClassContains,
        MatchRule::Pid,
    ];

    fn matches(self, saved: &WindowDescriptor, live: &WindowDescriptor) -> bool {
        match self {
            MatchRule::InitialTitle => {
                !saved.initial_title.is_empty() && live.initial_title == saved.initial_title
            }
            MatchRule::InitialClass => {
                !saved.initial_class.is_empty() && live.initial_class == saved.initial_class
            }
            MatchRule::Class => !saved.class.is_empty() && live.class == saved.class,
            MatchRule::ClassContains => {
                !saved.class.is_empty() && live.class.contains(saved.class.as_str())
            }
            MatchRule::Pid => saved.pid > 0 && live.pid == saved.pid,
        }
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchRule::InitialTitle => "initial title",
            MatchRule::InitialClass => "initial class",
            MatchRule::Class => "class",
            MatchRule::ClassContains => "partial class",
            MatchRule::Pid => "pid",
        };
        f.write_str(name)
    }
}

/// Find the live window that best matches a saved one.
///
/// Each rule in [`MatchRule::PRIORITY`] is tried against the whole live set
/// before the next one, so a title match on one window beats a class match
/// on another regardless of their order in `live`.
pub fn find<'a>(
    saved: &WindowDescriptor,
    live: &'a [WindowDescriptor],
) -> Option<(&'a WindowDescriptor, MatchRule)> {
    MatchRule::PRIORITY.iter().find_map(|rule| {
        live.iter()
            .find(|candidate| rule.matches(saved, candidate))
            .map(|candidate| (candidate, *rule))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(address: &str, class: &str, initial_title: &str, pid: i32) -> WindowDescriptor {
        WindowDescriptor {
            address: address.to_string(),
            class: class.to_string(),
            initial_class: class.to_string(),
            initial_title: initial_title.to_string(),
            pid,
            ..Default::default()
        }
    }

    #[test]
    fn test_title_match_beats_earlier_class_match() {
        let saved = window("0xold", "kitty", "Terminal", 100);
        let live = vec![
            window("0x1", "kitty", "something else", 200),
            window("0x2", "foot", "Terminal", 300),
        ];

        let (found, rule) = find(&saved, &live).unwrap();
        assert_eq!(found.address, "0x2");
        assert_eq!(rule, MatchRule::InitialTitle);
    }

    #[test]
    fn test_initial_class_before_class() {
        let saved = WindowDescriptor {
            class: "firefox".to_string(),
            initial_class: "firefox-nightly".to_string(),
            ..Default::default()
        };
        let live = vec![
            WindowDescriptor {
                address: "0x1".to_string(),
                class: "firefox".to_string(),
                ..Default::default()
            },
            WindowDescriptor {
                address: "0x2".to_string(),
                initial_class: "firefox-nightly".to_string(),
                ..Default::default()
            },
        ];

        let (found, rule) = find(&saved, &live).unwrap();
        assert_eq!(found.address, "0x2");
        assert_eq!(rule, MatchRule::InitialClass);
    }

    #[test]
    fn test_class_substring_match() {
        let saved = WindowDescriptor {
            class: "code".to_string(),
            ..Default::default()
        };
        let live = vec![WindowDescriptor {
            address: "0x9".to_string(),
            class: "code-url-handler".to_string(),
            ..Default::default()
        }];

        let (found, rule) = find(&saved, &live).unwrap();
        assert_eq!(found.address, "0x9");
        assert_eq!(rule, MatchRule::ClassContains);
    }

    #[test]
    fn test_pid_is_last_resort() {
        let saved = window("0xold", "", "", 4242);
        let live = vec![window("0x1", "other", "other", 1), window("0x2", "x", "y", 4242)];

        let (found, rule) = find(&saved, &live).unwrap();
        assert_eq!(found.address, "0x2");
        assert_eq!(rule, MatchRule::Pid);
    }

    #[test]
    fn test_empty_fields_never_match() {
        let saved = WindowDescriptor::default();
        let live = vec![WindowDescriptor::default()];
        assert!(find(&saved, &live).is_none());
    }

    #[test]
    fn test_no_match() {
        let saved = window("0xold", "gimp", "GNU Image Manipulation Program", 5);
        let live = vec![window("0x1", "kitty", "kitty", 6)];
        assert!(find(&saved, &live).is_none());
    }
}
