use crate::model::PlaylistItem;

#[inline]
fn token_value(stack: &mut String, it: &mut std::str::Chars) -> String {
    // Skip until the first double quote, the value ends at the closing quote.
    if it.any(|ch| ch == '"') {
        return get_value(stack, it);
    }
    String::new()
}

fn get_value(stack: &mut String, it: &mut std::str::Chars) -> String {
    for c in it.skip_while(|c| c.is_whitespace()) {
        if c == '"' {
            break;
        }
        stack.push(c);
    }

    let result = (*stack).clone();
    stack.clear();
    result
}

fn token_till(stack: &mut String, it: &mut std::str::Chars, stop_char: char, start_with_alpha: bool) -> Option<String> {
    let mut skip_non_alpha = start_with_alpha;

    for ch in it.by_ref() {
        if ch == stop_char {
            break;
        }
        if stack.is_empty() && ch.is_whitespace() {
            continue;
        }

        if skip_non_alpha {
            if ch.is_alphabetic() {
                skip_non_alpha = false;
            } else {
                continue;
            }
        }
        stack.push(ch);
    }

    if stack.is_empty() {
        None
    } else {
        let result = (*stack).clone();
        stack.clear();
        Some(result)
    }
}

#[inline]
fn skip_digit(it: &mut std::str::Chars) -> Option<char> {
    loop {
        match it.next() {
            Some(c) => {
                if !(c == '-' || c == '+' || c.is_ascii_digit()) {
                    return Some(c);
                }
            }
            None => return None,
        }
    }
}

macro_rules! process_header_fields {
    ($header:expr, $token:expr, $(($prop:ident, $field:expr)),*; $val:expr) => {
        match $token {
            $(
               $field => $header.$prop = $val,
             )*
            _ => {}
        }
    };
}

fn process_header(content: &str, url: String) -> PlaylistItem {
    let mut item = PlaylistItem { url, ..Default::default() };
    let mut it = content.chars();
    let mut stack = String::with_capacity(64);
    let line_token = token_till(&mut stack, &mut it, ':', false);
    if line_token.as_deref() == Some("#EXTINF") {
        let mut c = skip_digit(&mut it);
        loop {
            match c {
                None => break,
                Some(chr) => {
                    if chr.is_whitespace() {
                        // skip
                    } else if chr == ',' {
                        item.title = get_value(&mut stack, &mut it);
                    } else {
                        stack.push(chr);
                        let token = token_till(&mut stack, &mut it, '=', true);
                        if let Some(t) = token {
                            let value = token_value(&mut stack, &mut it);
                            process_header_fields!(item, t.to_lowercase().as_str(),
                                (id, "tvg-id"),
                                (group, "group-title"),
                                (name, "tvg-name"),
                                (logo, "tvg-logo"); value);
                        }
                    }
                }
            }
            c = it.next();
        }

        if item.name.is_empty() {
            item.name = item.title.clone();
        }
    }
    item
}

pub fn consume_m3u<F: FnMut(PlaylistItem)>(content: &str, mut visit: F) {
    let mut header: Option<String> = None;
    let mut group: Option<String> = None;

    for raw_line in content.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("#EXTINF") {
            header = Some(line.to_string());
            continue;
        }
        if let Some(grp) = line.strip_prefix("#EXTGRP:") {
            group = Some(grp.trim().to_string());
            continue;
        }
        if line.starts_with('#') {
            continue;
        }
        // a header survives interleaved junk lines and pairs with the next url line
        if line.starts_with("http") {
            if let Some(header_value) = header.take() {
                let mut item = process_header(&header_value, line.to_string());
                if item.group.is_empty() {
                    if let Some(group_value) = group.take() {
                        item.group = group_value;
                    }
                }
                visit(item);
            }
            group = None;
        }
    }
}

pub fn parse_m3u(content: &str) -> Vec<PlaylistItem> {
    let mut channels = Vec::new();
    consume_m3u(content, |item| channels.push(item));
    channels
}

#[cfg(test)]
mod tests {
    use super::{parse_m3u, process_header};

    #[test]
    fn test_process_header_1() {
        let url = "http://hello.de/hello.ts";
        let line = r#"#EXTINF:-1 tvg-id="abc-seven" tvg-logo="https://abc.nz/.images/seven.png" group-title="Sydney" , Seven"#;

        let item = process_header(line, url.to_string());
        assert_eq!(item.title, "Seven");
        assert_eq!(item.name, "Seven");
        assert_eq!(item.id, "abc-seven");
        assert_eq!(item.logo, "https://abc.nz/.images/seven.png");
        assert_eq!(item.group, "Sydney");
        assert_eq!(item.url, url);
    }

    #[test]
    fn test_process_header_2() {
        let url = "http://hello.de/hello.ts";
        let line = r#"#EXTINF:-1 tvg-id="abc-seven" tvg-logo="https://abc.nz/.images/seven.png" group-title="Sydney", Seven"#;

        let item = process_header(line, url.to_string());
        assert_eq!(item.title, "Seven");
        assert_eq!(item.id, "abc-seven");
        assert_eq!(item.group, "Sydney");
    }

    #[test]
    fn test_process_header_name_attribute_wins() {
        let line = r#"#EXTINF:-1 tvg-id="cnn.us" tvg-name="CNN International",CNN"#;
        let item = process_header(line, "http://example.com/cnn.ts".to_string());
        assert_eq!(item.name, "CNN International");
        assert_eq!(item.title, "CNN");
    }

    #[test]
    fn test_process_header_attribute_order_independent() {
        let left = process_header(r#"#EXTINF:-1 tvg-id="a" tvg-name="b",x"#, String::new());
        let right = process_header(r#"#EXTINF:-1 tvg-name="b" tvg-id="a",x"#, String::new());
        assert_eq!(left, right);
    }

    #[test]
    fn test_process_header_quoted_comma() {
        let line = r#"#EXTINF:-1 tvg-name="News, World" tvg-id="nw",News World"#;
        let item = process_header(line, String::new());
        assert_eq!(item.name, "News, World");
        assert_eq!(item.id, "nw");
        assert_eq!(item.title, "News World");
    }

    #[test]
    fn test_process_header_missing_attributes() {
        let item = process_header("#EXTINF:-1,Bare Channel", String::new());
        assert_eq!(item.id, "");
        assert_eq!(item.logo, "");
        assert_eq!(item.group, "");
        assert_eq!(item.name, "Bare Channel");
    }

    #[test]
    fn test_parse_m3u_pairs_header_with_url() {
        let content = "#EXTM3U\n#EXTINF:-1 tvg-id=\"x1\",First\nhttp://example.com/1.ts\n#EXTINF:-1,Second\nhttp://example.com/2.ts\n";
        let channels = parse_m3u(content);
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].id, "x1");
        assert_eq!(channels[0].url, "http://example.com/1.ts");
        assert_eq!(channels[1].name, "Second");
    }

    #[test]
    fn test_parse_m3u_header_without_url_dropped() {
        let content = "#EXTM3U\n#EXTINF:-1,Dangling\n#EXTINF:-1,Kept\nhttp://example.com/kept.ts\n";
        let channels = parse_m3u(content);
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].name, "Kept");
    }

    #[test]
    fn test_parse_m3u_header_survives_junk_lines() {
        let content = "#EXTINF:-1,Seven\nsome stray line\nhttp://example.com/seven.ts\n";
        let channels = parse_m3u(content);
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].name, "Seven");
        assert_eq!(channels[0].url, "http://example.com/seven.ts");
    }

    #[test]
    fn test_parse_m3u_extgrp() {
        let content = "#EXTINF:-1,Seven\n#EXTGRP:Sports\nhttp://example.com/seven.ts\n#EXTINF:-1 group-title=\"News\",Eight\n#EXTGRP:Ignored\nhttp://example.com/eight.ts\n";
        let channels = parse_m3u(content);
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].group, "Sports");
        // the explicit attribute wins over #EXTGRP
        assert_eq!(channels[1].group, "News");
    }

    #[test]
    fn test_parse_m3u_empty_input() {
        assert!(parse_m3u("").is_empty());
        assert!(parse_m3u("#EXTM3U\n").is_empty());
    }
}
