//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Crystal renderer configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[window]
# width = 800            # 1-16384
# height = 600           # 1-16384
# title = "Swarovski Crystal"
# vsync = true

[camera]
# position = [0.0, 0.0, 5.0]
# target = [0.0, 0.0, 0.0]
# up = [0.0, 1.0, 0.0]
# fov_degrees = 45.0     # 1-179
# near = 0.1
# far = 100.0

# Up to 4 lights. Declaring any replaces the defaults below.
# [[lighting.lights]]
# position = [3.0, 3.0, 5.0]
# color = [1.0, 1.0, 1.0]
#
# [[lighting.lights]]
# position = [-3.0, 3.0, 5.0]
# color = [0.5, 0.5, 0.5]

[material]
# crystal_color = [0.9, 0.9, 1.0]
# refraction_index = 1.5 # 1.0-3.0
# alpha = 0.85           # 0.0-1.0

[effects.fresnel]
# enabled = true
# power = 5.0            # 0.1-20.0

[effects.environment_mapping]
# enabled = true

[effects.dispersion]
# enabled = true
# strength = 0.05        # 0.0-1.0

[effects.specular]
# enabled = true
# strength = 0.8         # 0.0-10.0

[effects.glitter]
# enabled = true
# density = 100.0        # 1-10000

[bloom]
# enabled = true
# threshold = 0.8        # 0.0-1.0
# intensity = 0.3        # 0.0-5.0

[animation]
# rotation_speed = 0.3   # radians per second

[scene]
# model = "crystal.obj"
# environment_map = "skybox/"
# shader_dir = "shaders/"

[logging]
# level = "info"         # trace, debug, info, warn, error
"##
    .to_string()
}
