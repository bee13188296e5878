//! The two supported on-disk generations and their tables.

use std::fmt;

use crate::calendar::CalendarLayout;
use crate::descriptor::{AssignmentLayout, EntityLayout, FieldDescriptor, RelationLayout};
use crate::field::{ProjectField, ResourceField, TaskField};
use crate::view::{TableLayout, ViewLayout};
use crate::{mpp8, mpp9, properties};

/// A file generation, selected from the identity document's format tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Generation {
    /// Legacy single-stream records with deferred areas.
    Mpp8,
    /// Tagged stores and metadata-indexed fixed records.
    Mpp9,
}

impl Generation {
    pub const ALL: [Self; 2] = [Self::Mpp8, Self::Mpp9];

    /// Maps a format tag to its generation.
    ///
    /// Templates and global files share the project layout.
    #[must_use]
    pub fn from_format(format: &str) -> Option<Self> {
        match format {
            "MSProject.MPP9" | "MSProject.MPT9" | "MSProject.GLOBAL9" => Some(Self::Mpp9),
            "MSProject.MPP8" | "MSProject.MPT8" => Some(Self::Mpp8),
            _ => None,
        }
    }

    #[must_use]
    pub const fn project_dir(self) -> &'static str {
        match self {
            Self::Mpp8 => mpp8::PROJECT_DIR,
            Self::Mpp9 => mpp9::PROJECT_DIR,
        }
    }

    #[must_use]
    pub const fn view_dir(self) -> &'static str {
        match self {
            Self::Mpp8 => mpp8::VIEW_DIR,
            Self::Mpp9 => mpp9::VIEW_DIR,
        }
    }

    #[must_use]
    pub const fn tasks(self) -> &'static EntityLayout<TaskField> {
        match self {
            Self::Mpp8 => &mpp8::TASKS,
            Self::Mpp9 => &mpp9::TASKS,
        }
    }

    #[must_use]
    pub const fn resources(self) -> &'static EntityLayout<ResourceField> {
        match self {
            Self::Mpp8 => &mpp8::RESOURCES,
            Self::Mpp9 => &mpp9::RESOURCES,
        }
    }

    #[must_use]
    pub const fn relations(self) -> &'static RelationLayout {
        match self {
            Self::Mpp8 => &mpp8::RELATIONS,
            Self::Mpp9 => &mpp9::RELATIONS,
        }
    }

    #[must_use]
    pub const fn assignments(self) -> &'static AssignmentLayout {
        match self {
            Self::Mpp8 => &mpp8::ASSIGNMENTS,
            Self::Mpp9 => &mpp9::ASSIGNMENTS,
        }
    }

    #[must_use]
    pub const fn calendars(self) -> &'static CalendarLayout {
        match self {
            Self::Mpp8 => &mpp8::CALENDARS,
            Self::Mpp9 => &mpp9::CALENDARS,
        }
    }

    #[must_use]
    pub const fn properties(self) -> &'static [FieldDescriptor<ProjectField>] {
        properties::PROPERTIES
    }

    /// View records, where the generation's views are decoded.
    #[must_use]
    pub const fn views(self) -> Option<&'static ViewLayout> {
        match self {
            Self::Mpp8 => Some(&mpp8::VIEWS),
            Self::Mpp9 => None,
        }
    }

    /// Table records, where the generation's tables are decoded.
    #[must_use]
    pub const fn tables(self) -> Option<&'static TableLayout> {
        match self {
            Self::Mpp8 => Some(&mpp8::TABLES),
            Self::Mpp9 => None,
        }
    }

    /// The property holding the base week used by calendars without data.
    #[must_use]
    pub const fn default_calendar_hours(self) -> Option<i32> {
        match self {
            Self::Mpp8 => None,
            Self::Mpp9 => Some(mpp9::DEFAULT_CALENDAR_HOURS),
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mpp8 => "MPP8",
            Self::Mpp9 => "MPP9",
        })
    }
}
