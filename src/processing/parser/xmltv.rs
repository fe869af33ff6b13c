use crate::create_epgsieve_error_result;
use crate::epgsieve_error::{EpgsieveError, EpgsieveErrorKind};
use crate::model::{Epg, XmlTag, EPG_ATTRIB_CHANNEL, EPG_ATTRIB_ID, EPG_TAG_CHANNEL, EPG_TAG_PROGRAMME, EPG_TAG_TV};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;
use std::collections::HashMap;

fn handle_tag_start<F>(callback: &mut F, stack: &mut Vec<XmlTag>, e: &BytesStart)
where
    F: FnMut(XmlTag),
{
    let name = String::from_utf8_lossy(e.name().as_ref()).as_ref().to_owned();
    let attributes = collect_tag_attributes(e);
    let attribs = if attributes.is_empty() { None } else { Some(attributes) };
    let tag = XmlTag::new(name, attribs);

    if tag.name == EPG_TAG_TV {
        callback(tag);
    } else {
        stack.push(tag);
    }
}

fn handle_tag_end<F>(callback: &mut F, stack: &mut Vec<XmlTag>)
where
    F: FnMut(XmlTag),
{
    if !stack.is_empty() {
        if let Some(tag) = stack.pop() {
            if tag.name == EPG_TAG_CHANNEL {
                if let Some(chan_id) = tag.get_attribute_value(EPG_ATTRIB_ID) {
                    if !chan_id.is_empty() {
                        callback(tag);
                    }
                }
            } else if tag.name == EPG_TAG_PROGRAMME {
                if let Some(chan_id) = tag.get_attribute_value(EPG_ATTRIB_CHANNEL) {
                    if !chan_id.is_empty() {
                        callback(tag);
                    }
                }
            } else if !stack.is_empty() {
                if let Some(old_tag) = stack.pop().map(|mut r| {
                    r.children = Some(match r.children.take() {
                        None => vec![tag],
                        Some(mut tags) => {
                            tags.push(tag);
                            tags
                        }
                    });
                    r
                }) {
                    stack.push(old_tag);
                }
            }
        }
    }
}

fn handle_text_tag(stack: &mut [XmlTag], e: &BytesText) {
    if !stack.is_empty() {
        if let Ok(text) = e.unescape() {
            let t = text.trim();
            if !t.is_empty() {
                if let Some(tag) = stack.last_mut() {
                    tag.value = Some(t.to_string());
                }
            }
        }
    }
}

pub fn parse_tvguide<R, F>(content: R, callback: &mut F) -> Result<(), EpgsieveError>
where
    R: std::io::BufRead,
    F: FnMut(XmlTag),
{
    let mut stack: Vec<XmlTag> = vec![];
    let mut reader = Reader::from_reader(content);
    let mut buf = Vec::<u8>::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => handle_tag_start(callback, &mut stack, &e),
            Ok(Event::Empty(e)) => {
                handle_tag_start(callback, &mut stack, &e);
                handle_tag_end(callback, &mut stack);
            }
            Ok(Event::End(_e)) => handle_tag_end(callback, &mut stack),
            Ok(Event::Text(e)) => handle_text_tag(&mut stack, &e),
            Ok(_) => {}
            Err(err) => return create_epgsieve_error_result!(EpgsieveErrorKind::Parse, "Failed to parse epg content: {err}"),
        }
        buf.clear();
    }
    Ok(())
}

fn collect_tag_attributes(e: &BytesStart) -> HashMap<String, String> {
    let attributes = e.attributes().filter_map(Result::ok)
        .filter_map(|a| {
            let key = String::from_utf8_lossy(a.key.as_ref()).to_string();
            if let Ok(value) = a.unescape_value().as_ref() {
                if value.is_empty() {
                    None
                } else {
                    Some((key, value.to_string()))
                }
            } else {
                None
            }
        }).collect::<HashMap<String, String>>();
    attributes
}

/// Collects the whole guide document, channel and programme tags unfiltered
/// along with the attributes of the `tv` root tag.
pub fn parse_epg<R>(content: R) -> Result<Epg, EpgsieveError>
where
    R: std::io::BufRead,
{
    let mut children: Vec<XmlTag> = vec![];
    let mut tv_attributes: Option<HashMap<String, String>> = None;
    let mut collect_tags = |mut tag: XmlTag| {
        match tag.name.as_str() {
            EPG_TAG_CHANNEL | EPG_TAG_PROGRAMME => children.push(tag),
            EPG_TAG_TV => tv_attributes = tag.attributes.take(),
            _ => {}
        }
    };
    parse_tvguide(content, &mut collect_tags)?;
    Ok(Epg { attributes: tv_attributes, children })
}
