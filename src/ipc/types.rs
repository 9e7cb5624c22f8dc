use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Prefix the compositor uses for scratchpad workspace names
pub const SPECIAL_WORKSPACE_PREFIX: &str = "special:";

/// Observable attributes of one window, as reported by `j/clients`.
///
/// The same record is used for live windows and for the saved copy in a
/// session file. `address` is only meaningful within one compositor run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowDescriptor {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub initial_class: String,
    #[serde(default)]
    pub initial_title: String,
    #[serde(default)]
    pub pid: i32,
    #[serde(default)]
    pub floating: bool,
    #[serde(default)]
    pub at: [i32; 2],
    #[serde(default)]
    pub size: [i32; 2],
    #[serde(default)]
    pub workspace: WorkspaceRef,
    #[serde(default)]
    pub grouped: Vec<String>,
    #[serde(default, deserialize_with = "fullscreen_state")]
    pub fullscreen: u8,
}

impl WindowDescriptor {
    /// Synthetic key of the group this window belonged to, if any
    pub fn group_key(&self) -> Option<String> {
        if self.grouped.is_empty() {
            None
        } else {
            Some(self.grouped.concat())
        }
    }

    pub fn group_size(&self) -> usize {
        self.grouped.len()
    }

    pub fn has_size(&self) -> bool {
        self.size[0] > 0 && self.size[1] > 0
    }
}

/// Workspace a window lives on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceRef {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

impl WorkspaceRef {
    pub fn is_special(&self) -> bool {
        self.name.starts_with(SPECIAL_WORKSPACE_PREFIX)
    }

    /// Workspace name with any `special:` prefix removed
    pub fn bare_name(&self) -> &str {
        self.name
            .strip_prefix(SPECIAL_WORKSPACE_PREFIX)
            .unwrap_or(&self.name)
    }

    /// Selector accepted by window rules: numeric ids stay as they are,
    /// special workspaces keep their prefix, other names get `name:`.
    pub fn rule_selector(&self) -> String {
        if self.is_special() || self.name == self.id.to_string() {
            self.name.clone()
        } else {
            format!("name:{}", self.name)
        }
    }
}

// Older compositor versions report `fullscreen` as a bool.
fn fullscreen_state<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        State(u8),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Flag(flag) => u8::from(flag),
        Raw::State(state) => state,
    })
}

/// Direction passed to `moveintogroup`, pointing from the window to the group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("l"),
            Side::Right => f.write_str("r"),
        }
    }
}

/// Group action attached to a launched window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRule {
    /// Start a new group with this window
    Set,
    /// Join the group that already exists
    Invade,
}

/// Window rule applied by the compositor when a launched window appears
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowRule {
    Float,
    Tile,
    Size { width: i32, height: i32 },
    Move { x: i32, y: i32 },
    Fullscreen,
    Group(GroupRule),
    Workspace { selector: String, silent: bool },
}

impl fmt::Display for WindowRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowRule::Float => f.write_str("float"),
            WindowRule::Tile => f.write_str("tile"),
            WindowRule::Size { width, height } => write!(f, "size {} {}", width, height),
            WindowRule::Move { x, y } => write!(f, "move {} {}", x, y),
            WindowRule::Fullscreen => f.write_str("fullscreen"),
            WindowRule::Group(GroupRule::Set) => f.write_str("group set"),
            WindowRule::Group(GroupRule::Invade) => f.write_str("group invade"),
            WindowRule::Workspace { selector, silent } => {
                if *silent {
                    write!(f, "workspace {} silent", selector)
                } else {
                    write!(f, "workspace {}", selector)
                }
            }
        }
    }
}

/// A compositor dispatcher invocation.
///
/// Window-targeted variants carry the live address of the window they act
/// on; group commands act on the focused window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    SetFloating { address: String },
    SetTiled { address: String },
    Resize { address: String, width: i32, height: i32 },
    Move { address: String, x: i32, y: i32 },
    MoveToWorkspace { address: String, workspace: String },
    FocusWindow { address: String },
    ToggleGroup,
    MoveIntoGroup(Side),
    ToggleSpecialWorkspace { name: String },
    Exec { rules: Vec<WindowRule>, command: String },
}

impl Dispatch {
    /// Dispatcher name as understood by the compositor
    pub fn name(&self) -> &'static str {
        match self {
            Dispatch::SetFloating { .. } => "setfloating",
            Dispatch::SetTiled { .. } => "settiled",
            Dispatch::Resize { .. } => "resizewindowpixel",
            Dispatch::Move { .. } => "movewindowpixel",
            Dispatch::MoveToWorkspace { .. } => "movetoworkspacesilent",
            Dispatch::FocusWindow { .. } => "focuswindow",
            Dispatch::ToggleGroup => "togglegroup",
            Dispatch::MoveIntoGroup(_) => "moveintogroup",
            Dispatch::ToggleSpecialWorkspace { .. } => "togglespecialworkspace",
            Dispatch::Exec { .. } => "exec",
        }
    }

    /// Argument string following the dispatcher name
    pub fn args(&self) -> String {
        match self {
            Dispatch::SetFloating { address }
            | Dispatch::SetTiled { address }
            | Dispatch::FocusWindow { address } => format!("address:{}", address),
            Dispatch::Resize {
                address,
                width,
                height,
            } => format!("exact {} {},address:{}", width, height, address),
            Dispatch::Move { address, x, y } => format!("exact {} {},address:{}", x, y, address),
            Dispatch::MoveToWorkspace { address, workspace } => {
                format!("{},address:{}", workspace, address)
            }
            Dispatch::ToggleGroup => String::new(),
            Dispatch::MoveIntoGroup(side) => side.to_string(),
            Dispatch::ToggleSpecialWorkspace { name } => name.clone(),
            Dispatch::Exec { rules, command } => {
                if rules.is_empty() {
                    command.clone()
                } else {
                    let rules: Vec<String> = rules.iter().map(ToString::to_string).collect();
                    format!("[{}] {}", rules.join(";"), command)
                }
            }
        }
    }

    /// Full request payload for the control socket
    pub fn to_request(&self) -> String {
        let args = self.args();
        if args.is_empty() {
            format!("dispatch {}", self.name())
        } else {
            format!("dispatch {} {}", self.name(), args)
        }
    }
}

/// Errors raised by the compositor transport
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    /// `HYPRLAND_INSTANCE_SIGNATURE` is not set
    #[error("No compositor instance found (HYPRLAND_INSTANCE_SIGNATURE is unset)")]
    MissingInstance,

    #[error("Failed to connect to {path}: {source}")]
    Connect {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed compositor reply: {0}")]
    Decode(#[from] serde_json::Error),

    /// The compositor answered nothing, usually because the request timed out
    #[error("Empty reply to '{0}'")]
    EmptyReply(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_from_clients_json() {
        let json = r#"{
            "address": "0x55e1",
            "mapped": true,
            "at": [100, 120],
            "size": [800, 600],
            "workspace": {"id": 3, "name": "3"},
            "floating": true,
            "class": "kitty",
            "title": "~/src",
            "initialClass": "kitty",
            "initialTitle": "kitty",
            "pid": 4242,
            "grouped": [],
            "fullscreen": 0
        }"#;

        let window: WindowDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(window.address, "0x55e1");
        assert_eq!(window.at, [100, 120]);
        assert_eq!(window.size, [800, 600]);
        assert_eq!(window.workspace.name, "3");
        assert_eq!(window.initial_title, "kitty");
        assert_eq!(window.pid, 4242);
        assert!(window.floating);
        assert_eq!(window.group_key(), None);
    }

    #[test]
    fn test_fullscreen_accepts_bool() {
        let window: WindowDescriptor =
            serde_json::from_str(r#"{"class": "mpv", "fullscreen": true}"#).unwrap();
        assert_eq!(window.fullscreen, 1);

        let window: WindowDescriptor =
            serde_json::from_str(r#"{"class": "mpv", "fullscreen": 2}"#).unwrap();
        assert_eq!(window.fullscreen, 2);
    }

    #[test]
    fn test_group_key_concatenates_members_in_order() {
        let window = WindowDescriptor {
            grouped: vec!["0xa".to_string(), "0xb".to_string()],
            ..Default::default()
        };
        assert_eq!(window.group_key().as_deref(), Some("0xa0xb"));
        assert_eq!(window.group_size(), 2);
    }

    #[test]
    fn test_workspace_names() {
        let special = WorkspaceRef {
            id: -98,
            name: "special:scratch".to_string(),
        };
        assert!(special.is_special());
        assert_eq!(special.bare_name(), "scratch");
        assert_eq!(special.rule_selector(), "special:scratch");

        let numbered = WorkspaceRef {
            id: 2,
            name: "2".to_string(),
        };
        assert!(!numbered.is_special());
        assert_eq!(numbered.bare_name(), "2");
        assert_eq!(numbered.rule_selector(), "2");

        let named = WorkspaceRef {
            id: 7,
            name: "web".to_string(),
        };
        assert_eq!(named.rule_selector(), "name:web");
    }

    #[test]
    fn test_dispatch_requests() {
        let resize = Dispatch::Resize {
            address: "0x1".to_string(),
            width: 800,
            height: 600,
        };
        assert_eq!(
            resize.to_request(),
            "dispatch resizewindowpixel exact 800 600,address:0x1"
        );

        let workspace = Dispatch::MoveToWorkspace {
            address: "0x1".to_string(),
            workspace: "1".to_string(),
        };
        assert_eq!(
            workspace.to_request(),
            "dispatch movetoworkspacesilent 1,address:0x1"
        );

        assert_eq!(Dispatch::ToggleGroup.to_request(), "dispatch togglegroup");
        assert_eq!(
            Dispatch::MoveIntoGroup(Side::Left).to_request(),
            "dispatch moveintogroup l"
        );
    }

    #[test]
    fn test_exec_request_bundles_rules() {
        let exec = Dispatch::Exec {
            rules: vec![
                WindowRule::Float,
                WindowRule::Size {
                    width: 800,
                    height: 600,
                },
                WindowRule::Move { x: 10, y: 20 },
                WindowRule::Group(GroupRule::Set),
                WindowRule::Workspace {
                    selector: "special:scratch".to_string(),
                    silent: true,
                },
            ],
            command: "foo --bar".to_string(),
        };

        assert_eq!(
            exec.to_request(),
            "dispatch exec [float;size 800 600;move 10 20;group set;workspace special:scratch silent] foo --bar"
        );

        let bare = Dispatch::Exec {
            rules: vec![],
            command: "foo".to_string(),
        };
        assert_eq!(bare.to_request(), "dispatch exec foo");
    }
}
