use core::ffi::c_int;
use serde_json::json;
use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    ptr, slice,
};

pub mod utilities;
use utilities::{
    apply_correction::apply_correction as apply_correction_rs,
    batch_correction::{BatchItem, batch_correction as batch_correction_rs},
    calculate_baseline::CorrectionOptions,
    check_constraints::check_constraints as check_constraints_rs,
    errors::{AlsError, ErrorKind, OptimizerError},
    evaluate_plan_line::OptimizerOptions,
    generate_report::generate_report,
    optimize_plan_line::optimize_plan_line as optimize_plan_line_rs,
    structs::SamplePoint,
};

const OK: c_int = 0;
const ERR_INVALID_ARGS: c_int = 1;
const ERR_PANIC: c_int = 2;
const ERR_VALIDATION: c_int = 3;
const ERR_PARSE: c_int = 4;
const ERR_NUMERICAL: c_int = 5;

#[repr(C)]
pub struct Buf {
    pub ptr: *mut u8,
    pub len: usize,
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn alloc(size: usize) -> *mut u8 {
    if size == 0 {
        return core::ptr::null_mut();
    }
    let mut v = Vec::<u8>::with_capacity(size);
    let p = v.as_mut_ptr();
    core::mem::forget(v);
    p
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn free_(ptr_raw: *mut u8, size: usize) {
    if !ptr_raw.is_null() {
        let _ = unsafe { Vec::<u8>::from_raw_parts(ptr_raw, size, size) };
    }
}

/// `series_ptr` holds a JSON array of `{position, value}`; `options_ptr` may be
/// null for defaults. Writes the correction result (or `{"error": ...}`) to `out_json`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn apply_correction(
    series_ptr: *const u8,
    series_len: usize,
    options_ptr: *const u8,
    options_len: usize,
    out_json: *mut Buf,
) -> c_int {
    if series_ptr.is_null() || out_json.is_null() {
        return ERR_INVALID_ARGS;
    }
    let res = catch_unwind(AssertUnwindSafe(|| -> Result<(), c_int> {
        let series_s = unsafe { read_str(series_ptr, series_len) }.ok_or(ERR_PARSE)?;
        let options_s = unsafe { read_options(options_ptr, options_len) }?;
        let series: Vec<SamplePoint> =
            serde_json::from_str(series_s).map_err(|_| ERR_PARSE)?;
        let options = CorrectionOptions::from_json(options_s).map_err(|_| ERR_PARSE)?;

        match apply_correction_rs(&series, &options) {
            Ok(result) => write_json(out_json, &result),
            Err(e) => write_als_error(out_json, &e),
        }
    }));
    finish(res)
}

/// `items_ptr` holds a JSON array of `{id, series}`. Per-item failures are
/// reported inside the result, so this only fails on malformed input.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn batch_correction(
    items_ptr: *const u8,
    items_len: usize,
    options_ptr: *const u8,
    options_len: usize,
    cores: usize,
    out_json: *mut Buf,
) -> c_int {
    if items_ptr.is_null() || out_json.is_null() {
        return ERR_INVALID_ARGS;
    }
    let res = catch_unwind(AssertUnwindSafe(|| -> Result<(), c_int> {
        let items_s = unsafe { read_str(items_ptr, items_len) }.ok_or(ERR_PARSE)?;
        let options_s = unsafe { read_options(options_ptr, options_len) }?;
        let items: Vec<BatchItem> = serde_json::from_str(items_s).map_err(|_| ERR_PARSE)?;
        let options = CorrectionOptions::from_json(options_s).map_err(|_| ERR_PARSE)?;

        let report = batch_correction_rs(&items, &options, cores);
        write_json(out_json, &report)
    }));
    finish(res)
}

/// Writes `{result, constraints, report}` for the optimized plan line.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn optimize_plan_line(
    restored_ptr: *const u8,
    restored_len: usize,
    plan_ptr: *const u8,
    plan_len: usize,
    options_ptr: *const u8,
    options_len: usize,
    out_json: *mut Buf,
) -> c_int {
    if restored_ptr.is_null() || plan_ptr.is_null() || out_json.is_null() {
        return ERR_INVALID_ARGS;
    }
    let res = catch_unwind(AssertUnwindSafe(|| -> Result<(), c_int> {
        let (restored, plan, options) = unsafe {
            read_plan_inputs(
                restored_ptr,
                restored_len,
                plan_ptr,
                plan_len,
                options_ptr,
                options_len,
            )
        }?;

        let result = match optimize_plan_line_rs(&restored, &plan, &options) {
            Ok(r) => r,
            Err(e) => return write_optimizer_error(out_json, &e),
        };
        let constraints = match check_constraints_rs(&restored, &result.optimized_plan_line, &options)
        {
            Ok(c) => c,
            Err(e) => return write_optimizer_error(out_json, &e),
        };
        let report = generate_report(&result, &constraints);
        let text = report.to_string();
        write_json(
            out_json,
            &json!({
                "result": result,
                "constraints": constraints,
                "report": report,
                "text": text,
            }),
        )
    }));
    finish(res)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn check_constraints(
    restored_ptr: *const u8,
    restored_len: usize,
    plan_ptr: *const u8,
    plan_len: usize,
    options_ptr: *const u8,
    options_len: usize,
    out_json: *mut Buf,
) -> c_int {
    if restored_ptr.is_null() || plan_ptr.is_null() || out_json.is_null() {
        return ERR_INVALID_ARGS;
    }
    let res = catch_unwind(AssertUnwindSafe(|| -> Result<(), c_int> {
        let (restored, plan, options) = unsafe {
            read_plan_inputs(
                restored_ptr,
                restored_len,
                plan_ptr,
                plan_len,
                options_ptr,
                options_len,
            )
        }?;
        match check_constraints_rs(&restored, &plan, &options) {
            Ok(report) => write_json(out_json, &report),
            Err(e) => write_optimizer_error(out_json, &e),
        }
    }));
    finish(res)
}

unsafe fn read_plan_inputs(
    restored_ptr: *const u8,
    restored_len: usize,
    plan_ptr: *const u8,
    plan_len: usize,
    options_ptr: *const u8,
    options_len: usize,
) -> Result<(Vec<SamplePoint>, Vec<SamplePoint>, OptimizerOptions), c_int> {
    let restored_s = unsafe { read_str(restored_ptr, restored_len) }.ok_or(ERR_PARSE)?;
    let plan_s = unsafe { read_str(plan_ptr, plan_len) }.ok_or(ERR_PARSE)?;
    let options_s = unsafe { read_options(options_ptr, options_len) }?;
    let restored: Vec<SamplePoint> = serde_json::from_str(restored_s).map_err(|_| ERR_PARSE)?;
    let plan: Vec<SamplePoint> = serde_json::from_str(plan_s).map_err(|_| ERR_PARSE)?;
    let options = OptimizerOptions::from_json(options_s).map_err(|_| ERR_PARSE)?;
    Ok((restored, plan, options))
}

/// Null options mean defaults; present but malformed bytes are a parse error.
unsafe fn read_options<'a>(p: *const u8, len: usize) -> Result<&'a str, c_int> {
    if p.is_null() {
        return Ok("");
    }
    unsafe { read_str(p, len) }.ok_or(ERR_PARSE)
}

unsafe fn read_str<'a>(p: *const u8, len: usize) -> Option<&'a str> {
    if p.is_null() {
        return None;
    }
    let bytes = unsafe { slice::from_raw_parts(p, len) };
    std::str::from_utf8(bytes).ok()
}

fn finish(res: std::thread::Result<Result<(), c_int>>) -> c_int {
    match res {
        Ok(Ok(())) => OK,
        Ok(Err(code)) => code,
        Err(_) => ERR_PANIC,
    }
}

fn write_json<T: serde::Serialize>(out: *mut Buf, v: &T) -> Result<(), c_int> {
    let s = serde_json::to_string(v).map_err(|_| ERR_PARSE)?;
    write_buf(out, s.into_bytes().into_boxed_slice());
    Ok(())
}

fn write_als_error(out: *mut Buf, e: &AlsError) -> Result<(), c_int> {
    let (code, kind) = match e.kind() {
        ErrorKind::Numerical => (ERR_NUMERICAL, "numerical"),
        ErrorKind::Configuration => (ERR_VALIDATION, "configuration"),
        ErrorKind::Validation => (ERR_VALIDATION, "validation"),
    };
    write_json(out, &json!({ "error": e.to_string(), "kind": kind }))?;
    Err(code)
}

fn write_optimizer_error(out: *mut Buf, e: &OptimizerError) -> Result<(), c_int> {
    write_json(out, &json!({ "error": e.to_string(), "kind": "validation" }))?;
    Err(ERR_VALIDATION)
}

fn write_buf(out: *mut Buf, bytes: Box<[u8]>) {
    let len = bytes.len();
    let ptr_bytes = Box::into_raw(bytes) as *mut u8;
    unsafe {
        ptr::write_unaligned(
            out,
            Buf {
                ptr: ptr_bytes,
                len,
            },
        )
    };
}
