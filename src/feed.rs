//! Activity Feed
//!
//! Timeline of dashboard items. Each item carries an icon, a dated header
//! and a card with a category and summary, plus an optional click action.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tokio::sync::RwLock;

/// Icon shown in an item's avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityIcon {
    Card,
    #[default]
    Menu,
    Calendar,
    People,
    Bubbles,
    RobotFace,
    RobotArm,
    Flag,
}

impl ActivityIcon {
    pub const ALL: [ActivityIcon; 8] = [
        ActivityIcon::Card,
        ActivityIcon::Menu,
        ActivityIcon::Calendar,
        ActivityIcon::People,
        ActivityIcon::Bubbles,
        ActivityIcon::RobotFace,
        ActivityIcon::RobotArm,
        ActivityIcon::Flag,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityIcon::Card => "card",
            ActivityIcon::Menu => "menu",
            ActivityIcon::Calendar => "calendar",
            ActivityIcon::People => "people",
            ActivityIcon::Bubbles => "bubbles",
            ActivityIcon::RobotFace => "robot_face",
            ActivityIcon::RobotArm => "robot_arm",
            ActivityIcon::Flag => "flag",
        }
    }

    /// Resolve an icon name; unknown names fall back to [`ActivityIcon::Menu`]
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl fmt::Display for ActivityIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityIcon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityIcon::ALL
            .iter()
            .copied()
            .find(|icon| icon.as_str() == s)
            .ok_or_else(|| format!("Unknown icon: {}", s))
    }
}

/// What happens when an item is clicked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ActivityAction {
    /// Absolute or relative link
    Link { href: String },
    /// Modal with a title and text
    Popup { title: String, body: String },
    /// Refresh the status tracker and show its detail list
    StatusPanel,
}

/// One feed entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityItem {
    pub icon: ActivityIcon,
    pub title: String,
    pub date: NaiveDate,
    pub category: String,
    pub summary: String,
    #[serde(default)]
    pub action: Option<ActivityAction>,
}

impl ActivityItem {
    pub fn new(
        icon: ActivityIcon,
        title: impl Into<String>,
        date: NaiveDate,
        category: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            icon,
            title: title.into(),
            date,
            category: category.into(),
            summary: summary.into(),
            action: None,
        }
    }

    pub fn action(mut self, action: ActivityAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn link(self, href: impl Into<String>) -> Self {
        self.action(ActivityAction::Link { href: href.into() })
    }

    pub fn popup(self, title: impl Into<String>, body: impl Into<String>) -> Self {
        self.action(ActivityAction::Popup {
            title: title.into(),
            body: body.into(),
        })
    }
}

/// Ordered list of activity items, oldest first
#[derive(Debug, Default)]
pub struct ActivityFeed {
    items: RwLock<Vec<ActivityItem>>,
}

impl ActivityFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed seeded with the standard dashboard entries dated `date`
    pub fn with_defaults(date: NaiveDate) -> Self {
        Self {
            items: RwLock::new(default_items(date)),
        }
    }

    /// Feed seeded for today
    pub fn with_defaults_today() -> Self {
        Self::with_defaults(Local::now().date_naive())
    }

    pub async fn push(&self, item: ActivityItem) -> usize {
        let mut items = self.items.write().await;
        items.push(item);
        items.len()
    }

    pub async fn items(&self) -> Vec<ActivityItem> {
        self.items.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

/// Standard entries: links, popups and the System Status panel
pub fn default_items(date: NaiveDate) -> Vec<ActivityItem> {
    vec![
        ActivityItem::new(
            ActivityIcon::RobotFace,
            "GitHub Repository",
            date,
            "Development",
            "Visit project repo",
        )
        .link("https://github.com"),
        ActivityItem::new(
            ActivityIcon::People,
            "Team Discussion",
            date,
            "Meeting",
            "View details",
        )
        .popup(
            "Team Discussion",
            "Next team sync is scheduled for tomorrow at 2 PM. Agenda: Q1 planning and feature roadmap.",
        ),
        ActivityItem::new(
            ActivityIcon::Bubbles,
            "Chat Updates",
            date,
            "Communication",
            "New messages",
        )
        .popup("Chat Updates", "You have 5 unread messages from the team channel."),
        ActivityItem::new(
            ActivityIcon::Calendar,
            "Schedule Review",
            date,
            "Planning",
            "Check calendar",
        )
        .link("/calendar"),
        ActivityItem::new(
            ActivityIcon::Card,
            "System Status",
            date,
            "Status",
            "Click me to see details",
        )
        .action(ActivityAction::StatusPanel),
        ActivityItem::new(
            ActivityIcon::Flag,
            "Feature Release",
            date,
            "Announcement",
            "v2.0 available",
        )
        .popup("Feature Release", "This is an updated version. Tester."),
    ]
}

/// One sample entry per icon
pub fn demo_items(date: NaiveDate) -> Vec<ActivityItem> {
    ActivityIcon::ALL
        .iter()
        .map(|icon| {
            ActivityItem::new(
                *icon,
                format!("Name {}", icon),
                date,
                "Demo Category",
                "Sample Activity",
            )
        })
        .collect()
}
