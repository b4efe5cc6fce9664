//! Function pointer signatures of the link library exports
//!
//! Every call returns a raw [`RsError`](crate::RsError) code as `u32`.

use std::ffi::{c_char, c_int, c_void};

use crate::types::{AssetHandle, CameraData, FrameData, StreamHandle};

/// Logging callback registered with the link
pub type LoggerFn = unsafe extern "C" fn(text: *const c_char);

/// Resolves an exported symbol by nul-terminated name, null if absent
pub type SymbolResolverFn = unsafe extern "C" fn(name: *const c_char) -> *mut c_void;

pub type GetVersionFn = unsafe extern "C" fn(major: *mut c_int, minor: *mut c_int);
pub type RegisterLoggingFuncFn = unsafe extern "C" fn(logger: LoggerFn);
pub type UnregisterLoggingFuncFn = unsafe extern "C" fn();

pub type InitFn = unsafe extern "C" fn() -> u32;
pub type ShutdownFn = unsafe extern "C" fn() -> u32;

pub type CreateAssetFn =
    unsafe extern "C" fn(name: *const c_char, asset: *mut AssetHandle) -> u32;
pub type DestroyAssetFn = unsafe extern "C" fn(asset: *mut AssetHandle) -> u32;
pub type SetSchemaFn = unsafe extern "C" fn(asset: AssetHandle, json: *const c_char) -> u32;

pub type CreateStreamFn = unsafe extern "C" fn(
    asset: AssetHandle,
    name: *const c_char,
    handle: *mut StreamHandle,
) -> u32;
pub type DestroyStreamFn =
    unsafe extern "C" fn(asset: AssetHandle, handle: *mut StreamHandle) -> u32;

pub type AwaitFrameDataFn =
    unsafe extern "C" fn(asset: *mut AssetHandle, timeout_ms: c_int, data: *mut FrameData) -> u32;
pub type GetFrameParametersFn = unsafe extern "C" fn(
    asset: AssetHandle,
    schema_hash: u64,
    out: *mut c_void,
    out_size: usize,
) -> u32;
pub type GetFrameCameraFn = unsafe extern "C" fn(
    asset: AssetHandle,
    stream: StreamHandle,
    out: *mut CameraData,
) -> u32;
