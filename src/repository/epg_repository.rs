use crate::create_epgsieve_error;
use crate::epgsieve_error::{EpgsieveError, EpgsieveErrorKind};
use crate::model::Epg;
use crate::repository::XML_PREAMBLE;
use crate::utils::debug_if_enabled;
use crate::utils::{create_parent_dir, file_writer};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn epg_write_document<W: Write>(epg: &Epg, out: W) -> Result<W, EpgsieveError> {
    let mut buffered = file_writer(out);

    // A doctype pushed through BytesText gets its quotes escaped, the preamble goes out raw.
    buffered.write_all(XML_PREAMBLE.as_bytes())
        .map_err(|e| create_epgsieve_error!(EpgsieveErrorKind::Io, "failed to write XML header: {e}"))?;

    let mut writer = quick_xml::Writer::new(buffered);
    epg.write_to(&mut writer).map_err(|e| create_epgsieve_error!(EpgsieveErrorKind::Io, "failed to write epg: {e}"))?;

    let mut buffered = writer.into_inner();
    buffered.flush().map_err(|e| create_epgsieve_error!(EpgsieveErrorKind::Io, "failed to flush epg: {e}"))?;
    buffered.into_inner().map_err(|e| create_epgsieve_error!(EpgsieveErrorKind::Io, "failed to flush epg: {e}"))
}

pub fn epg_write(epg: &Epg, path: &Path) -> Result<(), EpgsieveError> {
    create_parent_dir(path).map_err(|e| create_epgsieve_error!(EpgsieveErrorKind::Io, "failed to create output directory: {e}"))?;
    let file = File::create(path).map_err(|e| create_epgsieve_error!(EpgsieveErrorKind::Io, "failed to create epg file: {e}"))?;

    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz")) {
        let encoder = epg_write_document(epg, GzEncoder::new(file, Compression::default()))?;
        encoder.finish().map_err(|e| create_epgsieve_error!(EpgsieveErrorKind::Io, "failed to finish gzip epg: {e}"))?;
    } else {
        epg_write_document(epg, file)?;
    }

    debug_if_enabled!("Epg written to {}", path.to_str().unwrap_or("?"));
    Ok(())
}
