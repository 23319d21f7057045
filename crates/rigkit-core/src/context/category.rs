//! Asset categories and where their folders live.

use std::fmt;
use std::str::FromStr;

use crate::errors::RigkitError;

/// Which folder a category hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryRoot {
    /// `{project}/{character}/wip/{category}`
    Wip,
    /// `{project}/{character}/{category}`
    Character,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Assets,
    Rigs,
    Textures,
    Shapes,
    Utilities,
    Shaders,
    Animation,
    Builds,
}

impl Category {
    pub const COUNT: usize = 8;

    pub const ALL: [Category; Category::COUNT] = [
        Category::Assets,
        Category::Rigs,
        Category::Textures,
        Category::Shapes,
        Category::Utilities,
        Category::Shaders,
        Category::Animation,
        Category::Builds,
    ];

    pub const fn folder_name(self) -> &'static str {
        match self {
            Category::Assets => "assets",
            Category::Rigs => "rigs",
            Category::Textures => "textures",
            Category::Shapes => "shapes",
            Category::Utilities => "utilities",
            Category::Shaders => "shaders",
            Category::Animation => "animation",
            Category::Builds => "builds",
        }
    }

    // Animation and builds sit next to `wip`, not inside it. Existing
    // projects on disk use this layout.
    pub const fn root(self) -> CategoryRoot {
        match self {
            Category::Animation | Category::Builds => CategoryRoot::Character,
            _ => CategoryRoot::Wip,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder_name())
    }
}

impl FromStr for Category {
    type Err = RigkitError;

    /// Accepts folder names plus the singular spellings older tools use
    /// (`texture`, `build`, `shader`, ...).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let category = match value.trim().to_lowercase().as_str() {
            "assets" | "asset" => Category::Assets,
            "rigs" | "rig" => Category::Rigs,
            "textures" | "texture" => Category::Textures,
            "shapes" | "shape" => Category::Shapes,
            "utilities" | "utility" => Category::Utilities,
            "shaders" | "shader" => Category::Shaders,
            "animation" | "animations" => Category::Animation,
            "builds" | "build" => Category::Builds,
            _ => return Err(RigkitError::InvalidName(value.to_string())),
        };
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn test_roots() {
        assert_eq!(Category::Animation.root(), CategoryRoot::Character);
        assert_eq!(Category::Builds.root(), CategoryRoot::Character);
        assert_eq!(Category::Shaders.root(), CategoryRoot::Wip);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("texture".parse::<Category>().unwrap(), Category::Textures);
        assert_eq!("Builds".parse::<Category>().unwrap(), Category::Builds);
        assert!("sculpts".parse::<Category>().is_err());
    }
}
