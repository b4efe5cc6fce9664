//! Protocol version and exported symbol names
//!
//! These strings must match exactly what the link library exports.

/// Major protocol version this crate speaks
pub const RENDER_STREAM_VERSION_MAJOR: i32 = 1;

/// Minor protocol version this crate speaks
pub const RENDER_STREAM_VERSION_MINOR: i32 = 7;

pub const RS_GET_VERSION: &[u8] = b"rs_getVersion\0";
pub const RS_INIT: &[u8] = b"rs_init\0";
pub const RS_SHUTDOWN: &[u8] = b"rs_shutdown\0";

pub const RS_REGISTER_LOGGING_FUNC: &[u8] = b"rs_registerLoggingFunc\0";
pub const RS_REGISTER_ERROR_LOGGING_FUNC: &[u8] = b"rs_registerErrorLoggingFunc\0";
pub const RS_REGISTER_VERBOSE_LOGGING_FUNC: &[u8] = b"rs_registerVerboseLoggingFunc\0";

pub const RS_UNREGISTER_LOGGING_FUNC: &[u8] = b"rs_unregisterLoggingFunc\0";
pub const RS_UNREGISTER_ERROR_LOGGING_FUNC: &[u8] = b"rs_unregisterErrorLoggingFunc\0";
pub const RS_UNREGISTER_VERBOSE_LOGGING_FUNC: &[u8] = b"rs_unregisterVerboseLoggingFunc\0";

pub const RS_CREATE_ASSET: &[u8] = b"rs_createAsset\0";
pub const RS_DESTROY_ASSET: &[u8] = b"rs_destroyAsset\0";
pub const RS_SET_SCHEMA: &[u8] = b"rs_setSchema\0";

pub const RS_CREATE_STREAM: &[u8] = b"rs_createStream\0";
pub const RS_DESTROY_STREAM: &[u8] = b"rs_destroyStream\0";

pub const RS_AWAIT_FRAME_DATA: &[u8] = b"rs_awaitFrameData\0";
pub const RS_GET_FRAME_PARAMETERS: &[u8] = b"rs_getFrameParameters\0";
pub const RS_GET_FRAME_CAMERA: &[u8] = b"rs_getFrameCamera\0";

/// Collected symbol names for iteration
pub const LINK_SYMBOLS: &[(&str, &[u8])] = &[
    ("rs_getVersion", RS_GET_VERSION),
    ("rs_init", RS_INIT),
    ("rs_shutdown", RS_SHUTDOWN),
    ("rs_registerLoggingFunc", RS_REGISTER_LOGGING_FUNC),
    ("rs_registerErrorLoggingFunc", RS_REGISTER_ERROR_LOGGING_FUNC),
    ("rs_registerVerboseLoggingFunc", RS_REGISTER_VERBOSE_LOGGING_FUNC),
    ("rs_unregisterLoggingFunc", RS_UNREGISTER_LOGGING_FUNC),
    ("rs_unregisterErrorLoggingFunc", RS_UNREGISTER_ERROR_LOGGING_FUNC),
    ("rs_unregisterVerboseLoggingFunc", RS_UNREGISTER_VERBOSE_LOGGING_FUNC),
    ("rs_createAsset", RS_CREATE_ASSET),
    ("rs_destroyAsset", RS_DESTROY_ASSET),
    ("rs_setSchema", RS_SET_SCHEMA),
    ("rs_createStream", RS_CREATE_STREAM),
    ("rs_destroyStream", RS_DESTROY_STREAM),
    ("rs_awaitFrameData", RS_AWAIT_FRAME_DATA),
    ("rs_getFrameParameters", RS_GET_FRAME_PARAMETERS),
    ("rs_getFrameCamera", RS_GET_FRAME_CAMERA),
];
