//! `render` command: JSON document to Atom XML.

use super::RenderArgs;
use anyhow::{Context, Result, bail};
use std::{
    fs,
    io::{self, Read, Write},
    path::Path,
};
use tola_atom::{FieldValue, config::AtomConfig, debug, log, to_feed, to_xml};

/// Read the input document, route it and write the feed.
pub fn run_render(args: &RenderArgs, config: &AtomConfig) -> Result<()> {
    let input = read_input(&args.input)?;
    let value: serde_json::Value = serde_json::from_str(&input)
        .with_context(|| format!("failed to parse `{}` as JSON", args.input.display()))?;
    let FieldValue::Map(fields) = FieldValue::from(value) else {
        bail!("`{}` must contain a JSON object", args.input.display());
    };

    let namespace = args.namespace.as_deref().or(config.namespace_uri());
    let feed = to_feed(fields, namespace)
        .with_context(|| format!("failed to map `{}` to an Atom feed", args.input.display()))?;

    let mut options = config.render_options();
    if let Some(minify) = args.minify {
        options.minify = minify;
    }
    debug!("atom"; "rendering {} entries (minify: {})", feed.entries.len(), options.minify);
    let xml = to_xml(&feed, &options)?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &xml)
                .with_context(|| format!("failed to write `{}`", path.display()))?;
            log!("atom"; "{}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(xml.as_bytes())?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

/// Read a file, or stdin for `-`.
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        return Ok(input);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read `{}`", path.display()))
}
