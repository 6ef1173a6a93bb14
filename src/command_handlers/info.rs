use crate::command_handlers::Context;
use crate::formula::Formula;
use crate::receipt::InstallReceipt;
use anyhow::Result;
use std::io::Write;

pub fn show(formula: &Formula, ctx: &Context, json: bool) -> Result<()> {
    write_info(&mut std::io::stdout().lock(), formula, ctx, json)
}

fn write_info<W: Write>(out: &mut W, formula: &Formula, ctx: &Context, json: bool) -> Result<()> {
    let meta = &formula.metadata;
    let keg = ctx.layout.keg(meta);
    // An unsupported host or an unreadable receipt still gets metadata.
    let download = formula.resolve_download(&ctx.host_os);
    let receipt = InstallReceipt::load(&keg).inspect_err(|e| {
        tracing::warn!(keg = %keg.display(), error = %e, "unreadable install receipt");
    });
    if json {
        let value = serde_json::json!({
            "name": meta.name,
            "version": meta.version_str(),
            "license": meta.license,
            "homepage": meta.homepage(),
            "description": meta.description,
            "download": download.as_ref().ok(),
            "installed": receipt.as_ref().ok().and_then(Option::as_ref),
            "receipt_error": receipt.as_ref().err().map(|e| e.to_string()),
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        return Ok(());
    }
    writeln!(out, "{} {}", meta.name, meta.version)?;
    if !meta.description.is_empty() {
        writeln!(out, "{}", meta.description)?;
    }
    writeln!(out, "license:  {}", meta.license)?;
    writeln!(out, "homepage: {}", meta.homepage())?;
    match download {
        Ok(d) => {
            writeln!(out, "os:       {}", d.os_name)?;
            writeln!(out, "url:      {}", d.url)?;
            writeln!(out, "sha256:   {}", d.expected_digest)?;
        }
        Err(e) => writeln!(out, "download: {e}")?,
    }
    match receipt {
        Ok(Some(r)) => writeln!(out, "installed: {} ({})", keg.display(), r.installed_at.to_rfc3339())?,
        Ok(None) => writeln!(out, "installed: no")?,
        Err(_) => writeln!(out, "installed: unknown")?,
    }
    Ok(())
}

pub fn print_url(formula: &Formula, os: &str) -> Result<()> {
    let variant = formula.resolve_variant(os)?;
    println!("{}", variant.build_download_url());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::Layout;
    use crate::receipt::RECEIPT_FILE;

    fn ctx(root: &std::path::Path, host: &str) -> Context {
        Context {
            host_os: host.to_string(),
            layout: Layout::from_prefix(root),
            cache_dir: root.join("cache"),
        }
    }

    fn render(formula: &Formula, ctx: &Context, json: bool) -> String {
        let mut buf = Vec::new();
        write_info(&mut buf, formula, ctx, json).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn corrupt_receipt_still_prints_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ctx(dir.path(), "Linux");
        let formula = Formula::xnx().unwrap();
        let keg = ctx.layout.keg(&formula.metadata);
        std::fs::create_dir_all(&keg).unwrap();
        std::fs::write(keg.join(RECEIPT_FILE), b"{ not json").unwrap();

        let text = render(&formula, &ctx, false);
        assert!(text.starts_with("xnx 0.2.0\n"), "{text}");
        assert!(text.contains("installed: unknown"), "{text}");

        let json: serde_json::Value = serde_json::from_str(&render(&formula, &ctx, true)).unwrap();
        assert_eq!(json["name"], "xnx");
        assert!(json["installed"].is_null());
        assert!(json["receipt_error"].is_string());
    }

    #[test]
    fn unsupported_host_reports_download_error() {
        let dir = tempfile::tempdir().unwrap();
        let formula = Formula::xnx().unwrap();
        let text = render(&formula, &ctx(dir.path(), "Windows"), false);
        assert!(text.contains("download: unsupported host OS 'Windows'"), "{text}");
        assert!(text.contains("installed: no"), "{text}");
    }
}
