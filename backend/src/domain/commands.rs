//! Domain-level command types.
//! Inputs to service operations that take more than a scalar.

pub mod milestone {
    /// Partial update of a milestone's editable fields.
    /// `None` leaves the field unchanged.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct MilestoneUpdate {
        pub count: Option<u32>,
        pub reward_name: Option<String>,
        pub reward_emoji: Option<String>,
    }

    impl MilestoneUpdate {
        pub fn reward_name(name: impl Into<String>) -> Self {
            Self {
                reward_name: Some(name.into()),
                ..Self::default()
            }
        }

        pub fn reward_emoji(emoji: impl Into<String>) -> Self {
            Self {
                reward_emoji: Some(emoji.into()),
                ..Self::default()
            }
        }

        pub fn count(count: u32) -> Self {
            Self {
                count: Some(count),
                ..Self::default()
            }
        }
    }
}
