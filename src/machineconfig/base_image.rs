use crate::config::ControllerConfigSpec;

/// Supplies the default OS image written into every generated object
pub trait BaseImageSource: Send + Sync {
    fn default_base_image(&self, spec: &ControllerConfigSpec) -> String;
}

/// Reads `baseOSContainerImage` from the controller config
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecBaseImage;

impl BaseImageSource for SpecBaseImage {
    fn default_base_image(&self, spec: &ControllerConfigSpec) -> String {
        spec.base_os_container_image.clone()
    }
}
