use super::AppContext;
use serde::Serialize;

#[derive(Serialize)]
struct RegionSummary<'a> {
    code: &'a str,
    name: &'a str,
    signature: &'a str,
    fields: usize,
}

/// Print every registered region in detection order
pub fn list(ctx: &AppContext) -> anyhow::Result<()> {
    let summaries: Vec<RegionSummary> = ctx
        .registry
        .profiles()
        .map(|p| RegionSummary {
            code: &p.code,
            name: &p.name,
            signature: &p.signature,
            fields: p.fields.len(),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&summaries)?);
    Ok(())
}
