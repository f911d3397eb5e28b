//! Templates embedded into the binary at compile time using
//! [`rust-embed`](rust_embed), rendered with [`upon`].

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use rust_embed::Embed;
use serde::Serialize;
use upon::Engine;

pub(crate) const INFO_PLIST: &str = "Info.plist";
pub(crate) const LANDING_PAGE: &str = "index.html";

#[derive(Embed)]
#[folder = "../../assets/templates/"]
pub(crate) struct Templates;
impl Templates {
    pub(crate) fn load(name: &str) -> Result<String> {
        let file = Self::get(name).ok_or_raise(|| ErrorKind::AssetNotFound(name.to_string()))?;
        String::from_utf8(file.data.into_owned()).or_raise(|| ErrorKind::AssetNotFound(name.to_string()))
    }

    pub(crate) fn render(name: &str, context: &impl Serialize) -> Result<String> {
        let source = Self::load(name)?;
        let mut engine = Engine::new();
        addons::configure(&mut engine);
        let template = engine.compile(source.as_str()).or_raise(|| ErrorKind::Template)?;
        template.render(&engine, context).to_string().or_raise(|| ErrorKind::Template)
    }
}

mod addons {
    use std::fmt::Write;
    use upon::{Engine, Value, fmt as upon_fmt};

    /// Escapes the five XML special characters, which also covers HTML text.
    fn xml_formatter(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
        match value {
            Value::String(s) => {
                for c in s.chars() {
                    match c {
                        '&' => f.write_str("&amp;")?,
                        '<' => f.write_str("&lt;")?,
                        '>' => f.write_str("&gt;")?,
                        '"' => f.write_str("&quot;")?,
                        '\'' => f.write_str("&apos;")?,
                        c => f.write_char(c)?,
                    }
                }
            },
            v => upon_fmt::default(f, v)?,
        };
        Ok(())
    }

    pub(crate) fn configure(engine: &mut Engine<'_>) {
        engine.add_formatter("xml", xml_formatter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_are_embedded() {
        assert!(Templates::load(INFO_PLIST).unwrap().contains("isDashDocset"));
        assert!(Templates::load(LANDING_PAGE).unwrap().contains("<ul>"));
    }

    #[test]
    fn unknown_template() {
        let err = Templates::load("missing.txt").unwrap_err();
        assert!(matches!(&*err, ErrorKind::AssetNotFound(name) if name == "missing.txt"));
    }

    #[test]
    fn values_are_escaped() {
        #[derive(Serialize)]
        struct Context<'a> {
            revision: &'a str,
            title: &'a str,
            index: &'a str,
        }
        let plist = Templates::render(INFO_PLIST, &Context {
            revision: "a&b",
            title: "<nixpkgs>",
            index: "index.html",
        })
        .unwrap();
        assert!(plist.contains("<string>nixpkgs-a&amp;b</string>"));
        assert!(plist.contains("<string>&lt;nixpkgs&gt;</string>"));
    }
}
