use crate::formula::Formula;
use anyhow::Result;

pub fn verify_formula(formula: &Formula) -> Result<()> {
    formula.validate()?;
    for v in &formula.variants {
        println!("{:<6} {} sha256={}", v.os_name.as_str(), v.build_download_url(), v.sha256);
    }
    println!("Formula {} {} OK", formula.metadata.name, formula.metadata.version);
    Ok(())
}
