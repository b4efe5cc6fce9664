//! Link function-table loading via a host-supplied symbol resolver

use std::ffi::{c_int, c_void, CStr};

use rsbridge_sdk::{
    versions, AwaitFrameDataFn, CreateAssetFn, CreateStreamFn, DestroyAssetFn, DestroyStreamFn,
    GetFrameCameraFn, GetFrameParametersFn, GetVersionFn, InitFn, RegisterLoggingFuncFn,
    SetSchemaFn, ShutdownFn, SymbolResolverFn, UnregisterLoggingFuncFn,
    RENDER_STREAM_VERSION_MAJOR, RENDER_STREAM_VERSION_MINOR,
};

use crate::error::LoadError;

/// Wrapper around a symbol resolver function
pub struct SymbolResolver {
    resolver: SymbolResolverFn,
    name: &'static str,
}

impl SymbolResolver {
    /// Create a new resolver wrapper
    ///
    /// # Arguments
    /// * `resolver` - Function looking up an export by nul-terminated name
    /// * `name` - Human-readable library name for error messages
    pub fn new(resolver: SymbolResolverFn, name: &'static str) -> Self {
        Self { resolver, name }
    }

    /// Resolve an export as a function pointer of type `F`
    ///
    /// # Arguments
    /// * `symbol` - Null-terminated export name (e.g., b"rs_init\0")
    ///
    /// # Safety
    /// `F` must be a function pointer type matching the export's signature.
    pub unsafe fn get<F: Copy>(&self, symbol: &[u8]) -> Result<F, LoadError> {
        debug_assert_eq!(
            std::mem::size_of::<F>(),
            std::mem::size_of::<*mut c_void>()
        );

        let symbol_str = CStr::from_bytes_with_nul(symbol).map_err(|_| {
            LoadError::InvalidSymbolName(String::from_utf8_lossy(symbol).into_owned())
        })?;

        let ptr = (self.resolver)(symbol_str.as_ptr());

        if ptr.is_null() {
            Err(LoadError::MissingSymbol(format!(
                "{} from {}",
                symbol_str.to_string_lossy(),
                self.name
            )))
        } else {
            Ok(std::mem::transmute_copy::<*mut c_void, F>(&ptr))
        }
    }

    /// Names of every symbol in `symbols` the resolver cannot find
    ///
    /// # Safety
    /// The resolver must be callable with any nul-terminated name.
    pub unsafe fn missing(&self, symbols: &[(&'static str, &[u8])]) -> Vec<&'static str> {
        symbols
            .iter()
            .filter(|(_, symbol)| {
                CStr::from_bytes_with_nul(symbol)
                    .map(|name| (self.resolver)(name.as_ptr()).is_null())
                    .unwrap_or(true)
            })
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Resolved link exports
#[derive(Clone, Copy)]
pub struct LinkApi {
    pub get_version: GetVersionFn,
    pub init: InitFn,
    pub shutdown: ShutdownFn,

    pub register_logging_func: RegisterLoggingFuncFn,
    pub register_error_logging_func: RegisterLoggingFuncFn,
    pub register_verbose_logging_func: RegisterLoggingFuncFn,

    pub unregister_logging_func: UnregisterLoggingFuncFn,
    pub unregister_error_logging_func: UnregisterLoggingFuncFn,
    pub unregister_verbose_logging_func: UnregisterLoggingFuncFn,

    pub create_asset: CreateAssetFn,
    pub destroy_asset: DestroyAssetFn,
    pub set_schema: SetSchemaFn,

    pub create_stream: CreateStreamFn,
    pub destroy_stream: DestroyStreamFn,

    pub await_frame_data: AwaitFrameDataFn,
    pub get_frame_parameters: GetFrameParametersFn,
    pub get_frame_camera: GetFrameCameraFn,
}

impl LinkApi {
    /// Query the library's protocol version as (major, minor)
    pub fn version(&self) -> (i32, i32) {
        let mut major: c_int = 0;
        let mut minor: c_int = 0;
        // SAFETY: the export writes two ints through valid pointers
        unsafe { (self.get_version)(&mut major, &mut minor) };
        (major, minor)
    }
}

/// Load every link export and check the protocol version
///
/// Any missing export fails the whole load.
///
/// # Safety
/// The resolver must be callable and every symbol it returns must have the
/// signature declared in `rsbridge_sdk::api`.
#[tracing::instrument(skip_all)]
pub unsafe fn load_api(resolver: SymbolResolverFn) -> Result<LinkApi, LoadError> {
    let lib = SymbolResolver::new(resolver, "link library");

    // Report every missing export at once
    let missing = lib.missing(versions::LINK_SYMBOLS);
    if !missing.is_empty() {
        return Err(LoadError::MissingSymbol(format!(
            "{} from {}",
            missing.join(", "),
            lib.name
        )));
    }

    let api = LinkApi {
        get_version: lib.get(versions::RS_GET_VERSION)?,
        init: lib.get(versions::RS_INIT)?,
        shutdown: lib.get(versions::RS_SHUTDOWN)?,

        register_logging_func: lib.get(versions::RS_REGISTER_LOGGING_FUNC)?,
        register_error_logging_func: lib.get(versions::RS_REGISTER_ERROR_LOGGING_FUNC)?,
        register_verbose_logging_func: lib.get(versions::RS_REGISTER_VERBOSE_LOGGING_FUNC)?,

        unregister_logging_func: lib.get(versions::RS_UNREGISTER_LOGGING_FUNC)?,
        unregister_error_logging_func: lib.get(versions::RS_UNREGISTER_ERROR_LOGGING_FUNC)?,
        unregister_verbose_logging_func: lib.get(versions::RS_UNREGISTER_VERBOSE_LOGGING_FUNC)?,

        create_asset: lib.get(versions::RS_CREATE_ASSET)?,
        destroy_asset: lib.get(versions::RS_DESTROY_ASSET)?,
        set_schema: lib.get(versions::RS_SET_SCHEMA)?,

        create_stream: lib.get(versions::RS_CREATE_STREAM)?,
        destroy_stream: lib.get(versions::RS_DESTROY_STREAM)?,

        await_frame_data: lib.get(versions::RS_AWAIT_FRAME_DATA)?,
        get_frame_parameters: lib.get(versions::RS_GET_FRAME_PARAMETERS)?,
        get_frame_camera: lib.get(versions::RS_GET_FRAME_CAMERA)?,
    };

    let (major, minor) = api.version();
    tracing::info!("Loaded link library version {}.{}", major, minor);

    if major != RENDER_STREAM_VERSION_MAJOR || minor != RENDER_STREAM_VERSION_MINOR {
        return Err(LoadError::VersionMismatch {
            expected_major: RENDER_STREAM_VERSION_MAJOR,
            expected_minor: RENDER_STREAM_VERSION_MINOR,
            found_major: major,
            found_minor: minor,
        });
    }

    Ok(api)
}
