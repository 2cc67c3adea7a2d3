//! Collision records.

use serde::{Deserialize, Serialize};

/// A top-level key defined by more than one layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Collision {
    /// Type name.
    pub key: String,

    /// Origin whose definition was replaced.
    pub previous_origin: String,

    /// Origin whose definition replaced it.
    pub origin: String,

    /// Both definitions are equal JSON values.
    pub identical: bool,
}

impl Collision {
    /// One-line description for logs.
    pub fn describe(&self) -> String {
        if self.identical {
            format!(
                "'{}' redefined identically by {} (first defined by {})",
                self.key, self.origin, self.previous_origin
            )
        } else {
            format!(
                "'{}' from {} overwritten by {}",
                self.key, self.previous_origin, self.origin
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let collision = Collision {
            key: "Balance".to_string(),
            previous_origin: "primitives".to_string(),
            origin: "pallets/dex".to_string(),
            identical: false,
        };
        assert_eq!(
            collision.describe(),
            "'Balance' from primitives overwritten by pallets/dex"
        );

        let same = Collision {
            identical: true,
            ..collision
        };
        assert!(same.describe().contains("redefined identically"));
    }
}
