//! Data-driven resolution checks.
//!
//! Each `tests/fixtures/*.json` file holds a `pens` table plus either the
//! expected world geometry per pen (`expect`) or the diagnostic code loading
//! or resolving must fail with (`error`).

use std::collections::HashMap;

use datatest_stable::Utf8Path;
use miette::Diagnostic;
use serde::Deserialize;
use topopen::{PenTable, SequentialIds, resolve};

const TOLERANCE: f64 = 1e-6;

#[derive(Deserialize)]
struct Fixture {
    #[serde(default)]
    expect: HashMap<String, Expected>,
    error: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Expected {
    x: Option<f64>,
    y: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    rotate: Option<f64>,
    center: Option<[f64; 2]>,
    /// `[x, y, width, height, rotate]`
    icon: Option<[f64; 5]>,
    anchors: Option<Vec<ExpectedAnchor>>,
}

#[derive(Deserialize)]
struct ExpectedAnchor {
    id: Option<String>,
    x: f64,
    y: f64,
}

fn check(pen: &str, what: &str, expected: Option<f64>, actual: f64) -> Result<(), String> {
    match expected {
        Some(e) if (e - actual).abs() > TOLERANCE => {
            Err(format!("{pen}.{what}: expected {e}, got {actual}"))
        }
        _ => Ok(()),
    }
}

fn run_fixture(path: &Utf8Path) -> datatest_stable::Result<()> {
    let json = std::fs::read_to_string(path)?;
    let fixture: Fixture = serde_json::from_str(&json)?;

    let loaded = PenTable::from_json(&json).and_then(|mut table| {
        resolve::resolve_all(&mut table, &mut SequentialIds::default())?;
        Ok(table)
    });

    let table = match (loaded, &fixture.error) {
        (Ok(table), None) => table,
        (Err(err), Some(code)) => {
            let actual = err.code().map(|c| c.to_string());
            if actual.as_deref() != Some(code.as_str()) {
                return Err(format!("{path}: expected {code}, got {actual:?} ({err})").into());
            }
            return Ok(());
        }
        (Ok(_), Some(code)) => return Err(format!("{path}: expected error {code}").into()),
        (Err(err), None) => return Err(format!("{path}: {err}").into()),
    };

    for (id, expected) in &fixture.expect {
        let pen = table.get(id).ok_or_else(|| format!("{path}: no pen {id}"))?;
        let calc = &pen.calculative;
        let rect = calc.world_rect.ok_or_else(|| format!("{id}: unresolved"))?;

        check(id, "x", expected.x, rect.x())?;
        check(id, "y", expected.y, rect.y())?;
        check(id, "width", expected.width, rect.width())?;
        check(id, "height", expected.height, rect.height())?;
        check(id, "rotate", expected.rotate, rect.rotate())?;
        check(id, "ex", expected.x.zip(expected.width).map(|(x, w)| x + w), rect.ex())?;
        check(id, "ey", expected.y.zip(expected.height).map(|(y, h)| y + h), rect.ey())?;
        if let Some([cx, cy]) = expected.center {
            check(id, "center.x", Some(cx), rect.center().x)?;
            check(id, "center.y", Some(cy), rect.center().y)?;
        }

        if let Some([x, y, w, h, r]) = expected.icon {
            let icon = calc.world_icon_rect.ok_or_else(|| format!("{id}: no icon rect"))?;
            check(id, "icon.x", Some(x), icon.x())?;
            check(id, "icon.y", Some(y), icon.y())?;
            check(id, "icon.width", Some(w), icon.width())?;
            check(id, "icon.height", Some(h), icon.height())?;
            check(id, "icon.rotate", Some(r), icon.rotate())?;
        }

        if let Some(anchors) = &expected.anchors {
            let actual = calc
                .world_anchors
                .as_ref()
                .ok_or_else(|| format!("{id}: no anchors"))?;
            if actual.len() != anchors.len() {
                return Err(format!(
                    "{id}: expected {} anchors, got {}",
                    anchors.len(),
                    actual.len()
                )
                .into());
            }
            for (i, (want, got)) in anchors.iter().zip(actual).enumerate() {
                check(id, &format!("anchors[{i}].x"), Some(want.x), got.x)?;
                check(id, &format!("anchors[{i}].y"), Some(want.y), got.y)?;
                if let Some(want_id) = &want.id {
                    if want_id != &got.id {
                        return Err(format!("{id}: anchor {i} id {} != {want_id}", got.id).into());
                    }
                }
                if got.pen_id != *id {
                    return Err(format!("{id}: anchor {i} owned by {}", got.pen_id).into());
                }
            }
        }
    }
    Ok(())
}

datatest_stable::harness! {
    { test = run_fixture, root = "tests/fixtures", pattern = r"\.json$" },
}
