//! Feeds SVG text to a [`DocumentHandler`] using `quick-xml`.
//!
//! ```no_run
//! let svg = std::fs::read_to_string("character.svg")?;
//! let document = svgrig_xml::parse_document(&svg, svgrig::SceneConfig::default())?;
//! let rig = svgrig::build_rig(document, svgrig::SkeletonTree::humanoid())?;
//! for item in rig.draw_list() {
//!     println!("{:?} z={}", item.node, item.z_index);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use svgrig::{
    Attributes, DocumentHandler, Error, ParsedDocument, Rig, SceneBuilder, SceneConfig,
    SkeletonTree, build_rig,
};

/// Replays `xml` as element events.
///
/// Self-closing elements produce a start immediately followed by an end.
/// Element names are reported without a namespace prefix. A tokenizer error
/// is passed to [`DocumentHandler::parse_error`] and stops the replay.
pub fn drive<H: DocumentHandler + ?Sized>(xml: &str, handler: &mut H) {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    handler.document_start();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = element_name(&e);
                handler.element_start(&name, &attributes(&e));
            }
            Ok(Event::Empty(e)) => {
                let name = element_name(&e);
                handler.element_start(&name, &attributes(&e));
                handler.element_end(&name);
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                handler.element_end(&name);
            }
            Ok(Event::Text(e)) => match e.unescape() {
                Ok(text) => handler.text(&text),
                Err(_) => handler.text(&String::from_utf8_lossy(&e)),
            },
            Ok(Event::CData(e)) => handler.text(&String::from_utf8_lossy(&e)),
            Ok(Event::Eof) => {
                handler.document_end();
                return;
            }
            Ok(_) => {}
            Err(err) => {
                handler.parse_error(&format!(
                    "{err} (at byte {})",
                    reader.error_position()
                ));
                return;
            }
        }
    }
}

/// Builds the flat scene of an SVG document.
pub fn parse_document(xml: &str, config: SceneConfig) -> Result<ParsedDocument, Error> {
    let mut builder = SceneBuilder::new(config);
    drive(xml, &mut builder);
    builder.finish()
}

/// [`parse_document`] followed by [`build_rig`].
pub fn rig_from_svg(xml: &str, config: SceneConfig, skeleton: SkeletonTree) -> Result<Rig, Error> {
    build_rig(parse_document(xml, config)?, skeleton)
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attributes(e: &BytesStart<'_>) -> Attributes {
    let mut out = Attributes::new();
    for attr in e.attributes() {
        let attr = match attr {
            Ok(attr) => attr,
            Err(err) => {
                log::warn!("skipping malformed attribute: {err}");
                continue;
            }
        };
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        out.push(key, value);
    }
    out
}
