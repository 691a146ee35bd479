use serde::{Deserialize, Serialize};

/// Which rendering backend the host should use this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    #[default]
    Raster,
    PathTraced,
}

impl RenderMode {
    pub fn toggled(self) -> Self {
        match self {
            RenderMode::Raster => RenderMode::PathTraced,
            RenderMode::PathTraced => RenderMode::Raster,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RenderMode::Raster => "raster",
            RenderMode::PathTraced => "path traced",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips() {
        assert_eq!(RenderMode::default(), RenderMode::Raster);
        assert_eq!(RenderMode::Raster.toggled(), RenderMode::PathTraced);
        assert_eq!(RenderMode::Raster.toggled().toggled(), RenderMode::Raster);
    }
}
