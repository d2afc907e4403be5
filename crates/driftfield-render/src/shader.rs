//! Shader validation and caching.
//!
//! Every WGSL source is parsed and validated with naga before wgpu sees it, so
//! a broken shader surfaces as a [`ShaderError::CompilationFailed`] carrying
//! the shader name and the diagnostic instead of a device panic.

use log::{debug, info};
use std::{collections::HashMap, path::PathBuf, sync::Arc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("shader '{name}' failed to compile: {message}")]
    CompilationFailed { name: String, message: String },

    #[error("shader file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read shader file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("shader '{name}' not found in library")]
    NotLoaded { name: String },
}

/// Parse and validate WGSL.
pub fn validate_wgsl(name: &str, source: &str) -> Result<naga::Module, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::CompilationFailed {
        name: name.to_string(),
        message: e.emit_to_string(source),
    })?;
    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| ShaderError::CompilationFailed {
        name: name.to_string(),
        message: format!("{e:?}"),
    })?;
    Ok(module)
}

/// Read a `.wgsl` file.
pub fn read_source(path: impl Into<PathBuf>) -> Result<String, ShaderError> {
    let path = path.into();
    if !path.exists() {
        return Err(ShaderError::FileNotFound { path });
    }
    Ok(std::fs::read_to_string(&path)?)
}

/// Validated shader modules by name.
#[derive(Default)]
pub struct ShaderLibrary {
    modules: HashMap<String, Arc<wgpu::ShaderModule>>,
}

impl ShaderLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `source` and create a module, replacing any module of the
    /// same name.
    pub fn load_from_source(
        &mut self,
        device: &wgpu::Device,
        name: &str,
        source: &str,
    ) -> Result<Arc<wgpu::ShaderModule>, ShaderError> {
        debug!("Validating shader '{name}'");
        validate_wgsl(name, source)?;

        let module = Arc::new(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(name),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        }));
        if self
            .modules
            .insert(name.to_string(), Arc::clone(&module))
            .is_some()
        {
            info!("Replaced shader '{name}'");
        } else {
            info!("Loaded shader '{name}'");
        }
        Ok(module)
    }

    /// Load a `.wgsl` file from disk under `name`.
    pub fn load_from_file(
        &mut self,
        device: &wgpu::Device,
        name: &str,
        path: impl Into<PathBuf>,
    ) -> Result<Arc<wgpu::ShaderModule>, ShaderError> {
        let source = read_source(path)?;
        self.load_from_source(device, name, &source)
    }

    pub fn get(&self, name: &str) -> Result<Arc<wgpu::ShaderModule>, ShaderError> {
        self.modules
            .get(name)
            .cloned()
            .ok_or_else(|| ShaderError::NotLoaded {
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::headless_device;

    const VALID_SHADER: &str = r#"
        @vertex
        fn vs_main(@builtin(vertex_index) idx: u32) -> @builtin(position) vec4<f32> {
            return vec4<f32>(0.0, 0.0, 0.0, 1.0);
        }

        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0, 0.0, 0.0, 1.0);
        }
    "#;

    const UNDECLARED: &str = r#"
        @vertex
        fn vs_main() -> @builtin(position) vec4<f32> {
            return undeclared_variable;
        }
    "#;

    const TYPE_MISMATCH: &str = r#"
        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            let x: f32 = 1u;
            return vec4<f32>(x);
        }
    "#;

    #[test]
    fn test_valid_source_passes() {
        assert!(validate_wgsl("ok", VALID_SHADER).is_ok());
    }

    #[test]
    fn test_diagnostic_names_shader() {
        let err = validate_wgsl("broken", UNDECLARED).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("broken"), "{text}");
        assert!(text.contains("undeclared_variable"), "{text}");
    }

    #[test]
    fn test_type_error_rejected() {
        assert!(matches!(
            validate_wgsl("mismatch", TYPE_MISMATCH),
            Err(ShaderError::CompilationFailed { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = read_source("/no/such/shader.wgsl").unwrap_err();
        assert!(matches!(err, ShaderError::FileNotFound { .. }));
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.wgsl");
        std::fs::write(&path, VALID_SHADER).unwrap();
        assert_eq!(read_source(&path).unwrap(), VALID_SHADER);
    }

    #[test]
    fn test_get_unloaded() {
        let library = ShaderLibrary::new();
        assert!(library.is_empty());
        assert!(matches!(library.get("nope"), Err(ShaderError::NotLoaded { .. })));
    }

    #[test]
    fn test_invalid_source_never_reaches_device() {
        let Some((device, _queue)) = headless_device() else {
            return;
        };
        let mut library = ShaderLibrary::new();
        assert!(library.load_from_source(&device, "bad", UNDECLARED).is_err());
        assert!(library.is_empty());
        library.load_from_source(&device, "good", VALID_SHADER).unwrap();
        let a = library.get("good").unwrap();
        let b = library.get("good").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
