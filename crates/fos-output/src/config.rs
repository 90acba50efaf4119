//! Renderer Configuration

use fos_a11y::Role;

/// Output renderer options
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Suffix appended to message ids for braille variants
    pub braille_suffix: String,

    /// Separator between units in the combined braille line
    pub braille_delimiter: String,

    /// Deepest template/render nesting before the render is aborted
    pub max_depth: usize,

    /// Roles that stop enter announcements on the way down from the root
    pub boundary_roles: Vec<Role>,
}

impl OutputConfig {
    pub fn is_boundary(&self, role: &Role) -> bool {
        self.boundary_roles.contains(role)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            braille_suffix: "_brl".to_string(),
            braille_delimiter: " ".to_string(),
            max_depth: 64,
            boundary_roles: vec![Role::Window],
        }
    }
}
