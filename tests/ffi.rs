use serde_json::Value;
use trackline::{Buf, apply_correction, batch_correction, check_constraints, free_, optimize_plan_line};

fn take_json(buf: Buf) -> Value {
    let bytes = unsafe { std::slice::from_raw_parts(buf.ptr, buf.len) }.to_vec();
    unsafe { free_(buf.ptr, buf.len) };
    serde_json::from_slice(&bytes).unwrap()
}

fn empty_buf() -> Buf {
    Buf {
        ptr: std::ptr::null_mut(),
        len: 0,
    }
}

fn series_json(values: &[f64]) -> String {
    let pts: Vec<Value> = values
        .iter()
        .enumerate()
        .map(|(i, v)| serde_json::json!({ "position": i as f64 * 0.25, "value": v }))
        .collect();
    Value::Array(pts).to_string()
}

#[test]
fn correction_round_trip_through_c_abi() {
    let series = series_json(&[0.0, 1.0, 4.0, 9.0, 16.0, 25.0, 16.0, 9.0, 4.0, 1.0, 0.0, 0.0]);
    let options = r#"{"baselineLength": 1.0}"#;
    let mut out = empty_buf();
    let rc = unsafe {
        apply_correction(
            series.as_ptr(),
            series.len(),
            options.as_ptr(),
            options.len(),
            &mut out,
        )
    };
    assert_eq!(rc, 0);
    let v = take_json(out);
    assert_eq!(v["points"].as_array().unwrap().len(), 12);
    assert_eq!(v["parameters"]["windowSize"], 4);
    assert_eq!(v["parameters"]["method"], "moving_average");
    assert!(v["statistics"]["frequencyAnalysis"].is_object());
}

#[test]
fn validation_errors_return_code_and_message() {
    let series = series_json(&[1.0; 5]);
    let mut out = empty_buf();
    let rc = unsafe { apply_correction(series.as_ptr(), series.len(), std::ptr::null(), 0, &mut out) };
    assert_eq!(rc, 3);
    let v = take_json(out);
    assert_eq!(v["kind"], "validation");
    assert!(v["error"].as_str().unwrap().contains("too few points"));
}

#[test]
fn malformed_input_is_a_parse_error() {
    let bad = "[{";
    let mut out = empty_buf();
    let rc = unsafe { apply_correction(bad.as_ptr(), bad.len(), std::ptr::null(), 0, &mut out) };
    assert_eq!(rc, 4);

    let rc = unsafe { apply_correction(std::ptr::null(), 0, std::ptr::null(), 0, &mut out) };
    assert_eq!(rc, 1);
}

#[test]
fn batch_through_c_abi() {
    let items = format!(
        r#"[{{"id": "a", "series": {}}}, {{"id": "b", "series": {}}}]"#,
        series_json(&[2.0; 20]),
        series_json(&[2.0; 3])
    );
    let mut out = empty_buf();
    let rc = unsafe {
        batch_correction(items.as_ptr(), items.len(), std::ptr::null(), 0, 2, &mut out)
    };
    assert_eq!(rc, 0);
    let v = take_json(out);
    assert_eq!(v["summary"]["succeeded"], 1);
    assert_eq!(v["summary"]["failed"], 1);
    assert_eq!(v["results"][1]["id"], "b");
}

#[test]
fn optimizer_through_c_abi() {
    let restored = series_json(&[0.0; 10]);
    let plan = series_json(&[-5.0; 10]);
    let options = r#"{"maxDownward": 10, "targetUpwardRatio": 0.7}"#;
    let mut out = empty_buf();
    let rc = unsafe {
        optimize_plan_line(
            restored.as_ptr(),
            restored.len(),
            plan.as_ptr(),
            plan.len(),
            options.as_ptr(),
            options.len(),
            &mut out,
        )
    };
    assert_eq!(rc, 0);
    let v = take_json(out);
    assert!(v["result"]["statistics"]["upwardRatio"].as_f64().unwrap() >= 0.7);
    assert_eq!(v["constraints"]["withinLimits"], true);
    assert!(v["text"].as_str().unwrap().starts_with("Upward-priority optimization"));

    let empty = "[]";
    let mut out = empty_buf();
    let rc = unsafe {
        optimize_plan_line(
            restored.as_ptr(),
            restored.len(),
            empty.as_ptr(),
            empty.len(),
            std::ptr::null(),
            0,
            &mut out,
        )
    };
    assert_eq!(rc, 3);
    assert_eq!(take_json(out)["error"], "plan line is empty");
}

#[test]
fn constraints_through_c_abi() {
    let restored = series_json(&[0.0; 3]);
    let plan = series_json(&[0.0, 55.0, -12.0]);
    let mut out = empty_buf();
    let rc = unsafe {
        check_constraints(
            restored.as_ptr(),
            restored.len(),
            plan.as_ptr(),
            plan.len(),
            std::ptr::null(),
            0,
            &mut out,
        )
    };
    assert_eq!(rc, 0);
    let v = take_json(out);
    assert_eq!(v["upwardViolations"], 1);
    assert_eq!(v["downwardViolations"], 1);
}

#[test]
fn numerical_errors_return_their_own_code() {
    // nine samples packed within a nanometre plus one far away
    let pts: Vec<Value> = (0..9)
        .map(|i| serde_json::json!({ "position": i as f64 * 1e-10, "value": (i % 3) as f64 }))
        .chain([serde_json::json!({ "position": 1.0, "value": 2.0 })])
        .collect();
    let series = Value::Array(pts).to_string();
    let options = r#"{"method": "polynomial", "polynomialDegree": 2}"#;
    let mut out = empty_buf();
    let rc = unsafe {
        apply_correction(
            series.as_ptr(),
            series.len(),
            options.as_ptr(),
            options.len(),
            &mut out,
        )
    };
    assert_eq!(rc, 5);
    let v = take_json(out);
    assert_eq!(v["kind"], "numerical");
    assert!(v["error"].as_str().unwrap().contains("singular matrix"));
}

#[test]
fn options_that_are_not_utf8_are_a_parse_error() {
    let series = series_json(&[1.0; 12]);
    let options = [b'{', 0xff, 0xfe, b'}'];
    let mut out = empty_buf();
    let rc = unsafe {
        apply_correction(
            series.as_ptr(),
            series.len(),
            options.as_ptr(),
            options.len(),
            &mut out,
        )
    };
    assert_eq!(rc, 4);

    let restored = series_json(&[0.0; 3]);
    let rc = unsafe {
        check_constraints(
            restored.as_ptr(),
            restored.len(),
            restored.as_ptr(),
            restored.len(),
            options.as_ptr(),
            options.len(),
            &mut out,
        )
    };
    assert_eq!(rc, 4);
}
