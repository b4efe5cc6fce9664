//! Link client calling through a resolved function table

use std::ffi::{c_char, c_int, c_void, CStr, CString};
use std::sync::atomic::{AtomicBool, Ordering};

use rsbridge_sdk::{AssetHandle, CameraData, FrameData, StreamHandle, SymbolResolverFn};

use crate::error::{LinkError, LoadError};
use crate::link::Link;
use crate::loader::{load_api, LinkApi};

unsafe extern "C" fn log_default(text: *const c_char) {
    if !text.is_null() {
        tracing::info!(target: "rsbridge::link", "{}", CStr::from_ptr(text).to_string_lossy());
    }
}

unsafe extern "C" fn log_error(text: *const c_char) {
    if !text.is_null() {
        tracing::error!(target: "rsbridge::link", "{}", CStr::from_ptr(text).to_string_lossy());
    }
}

unsafe extern "C" fn log_verbose(text: *const c_char) {
    if !text.is_null() {
        tracing::trace!(target: "rsbridge::link", "{}", CStr::from_ptr(text).to_string_lossy());
    }
}

/// Link backed by the external library's exports
///
/// Created once by the composition root. Becomes unavailable after
/// [`Link::shutdown`] and unregisters its log callbacks when dropped.
pub struct FfiLink {
    api: LinkApi,
    available: AtomicBool,
}

// SAFETY: the table holds plain function pointers into a library that lives
// for the whole process; the library serialises its own state.
unsafe impl Send for FfiLink {}
unsafe impl Sync for FfiLink {}

impl FfiLink {
    /// Resolve the library exports and route its logging into `tracing`
    ///
    /// # Safety
    /// Same requirements as [`load_api`].
    pub unsafe fn load(resolver: SymbolResolverFn) -> Result<Self, LoadError> {
        let api = load_api(resolver)?;

        (api.register_logging_func)(log_default);
        (api.register_error_logging_func)(log_error);
        (api.register_verbose_logging_func)(log_verbose);

        Ok(Self {
            api,
            available: AtomicBool::new(true),
        })
    }

    /// Wrap an already loaded table
    pub fn from_api(api: LinkApi) -> Self {
        Self {
            api,
            available: AtomicBool::new(true),
        }
    }

    fn ensure_available(&self) -> Result<(), LinkError> {
        if self.is_available() {
            Ok(())
        } else {
            Err(LinkError::Unavailable)
        }
    }
}

fn to_cstring(value: &str) -> Result<CString, LinkError> {
    CString::new(value).map_err(|_| LinkError::InvalidString(value.to_string()))
}

impl Link for FfiLink {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    fn version(&self) -> (i32, i32) {
        self.api.version()
    }

    fn init(&self) -> Result<(), LinkError> {
        self.ensure_available()?;
        LinkError::check(unsafe { (self.api.init)() })
    }

    fn shutdown(&self) -> Result<(), LinkError> {
        if !self.available.swap(false, Ordering::AcqRel) {
            return Ok(());
        }
        LinkError::check(unsafe { (self.api.shutdown)() })
    }

    fn create_asset(&self, name: &str) -> Result<AssetHandle, LinkError> {
        self.ensure_available()?;
        let name = to_cstring(name)?;
        let mut asset: AssetHandle = 0;
        LinkError::check(unsafe { (self.api.create_asset)(name.as_ptr(), &mut asset) })?;
        Ok(asset)
    }

    fn destroy_asset(&self, asset: AssetHandle) -> Result<(), LinkError> {
        self.ensure_available()?;
        let mut asset = asset;
        LinkError::check(unsafe { (self.api.destroy_asset)(&mut asset) })
    }

    fn create_stream(&self, asset: AssetHandle, name: &str) -> Result<StreamHandle, LinkError> {
        self.ensure_available()?;
        let name = to_cstring(name)?;
        let mut stream: StreamHandle = 0;
        LinkError::check(unsafe { (self.api.create_stream)(asset, name.as_ptr(), &mut stream) })?;
        Ok(stream)
    }

    fn destroy_stream(&self, asset: AssetHandle, stream: StreamHandle) -> Result<(), LinkError> {
        self.ensure_available()?;
        let mut stream = stream;
        LinkError::check(unsafe { (self.api.destroy_stream)(asset, &mut stream) })
    }

    fn poll_frame(&self, timeout_ms: u32) -> Result<(AssetHandle, FrameData), LinkError> {
        self.ensure_available()?;
        let timeout = c_int::try_from(timeout_ms).unwrap_or(c_int::MAX);
        let mut asset: AssetHandle = 0;
        let mut frame = FrameData::default();
        LinkError::check(unsafe { (self.api.await_frame_data)(&mut asset, timeout, &mut frame) })?;
        Ok((asset, frame))
    }

    fn fetch_parameters(
        &self,
        asset: AssetHandle,
        schema_hash: u64,
        count: usize,
    ) -> Result<Vec<f32>, LinkError> {
        self.ensure_available()?;
        let mut values = vec![0.0f32; count];
        let size = values.len() * std::mem::size_of::<f32>();
        LinkError::check(unsafe {
            (self.api.get_frame_parameters)(
                asset,
                schema_hash,
                values.as_mut_ptr() as *mut c_void,
                size,
            )
        })?;
        Ok(values)
    }

    fn fetch_camera(
        &self,
        asset: AssetHandle,
        stream: StreamHandle,
    ) -> Result<CameraData, LinkError> {
        self.ensure_available()?;
        let mut camera = CameraData::default();
        LinkError::check(unsafe { (self.api.get_frame_camera)(asset, stream, &mut camera) })?;
        Ok(camera)
    }

    fn publish_schema(&self, asset: AssetHandle, json: &str) -> Result<(), LinkError> {
        self.ensure_available()?;
        let json = to_cstring(json)?;
        LinkError::check(unsafe { (self.api.set_schema)(asset, json.as_ptr()) })
    }
}

impl Drop for FfiLink {
    fn drop(&mut self) {
        unsafe {
            (self.api.unregister_logging_func)();
            (self.api.unregister_error_logging_func)();
            (self.api.unregister_verbose_logging_func)();
        }
    }
}
