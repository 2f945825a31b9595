/* src/render.rs */

use crate::errors::ZoneError;
use crate::records::{RecordData, RecordType, ZoneConfig, ZoneRecord};
use crate::serial::Serial;

const TAB: char = '\t';
const TAB_SIZE: usize = 4;

/// Column (in tabs) where SOA comments start, relative to the SOA value.
const HEADER_COMMENT_TABS: usize = 3;
/// Width (in tabs) of the owner column.
const OWNER_TABS: usize = 5;
/// Width (in tabs) of the TTL column.
const TTL_TABS: usize = 2;

/// Renders `zone` as a master file.
///
/// Without a serial the SOA serial line is left out, which gives the text that an
/// existing file is compared against once its own serial line is stripped.
pub fn render_zone(zone: &ZoneConfig, serial: Option<&Serial>) -> Result<String, ZoneError> {
    let primary = zone
        .primary_nameserver()
        .ok_or_else(|| ZoneError::NoNameserver {
            domain: zone.name.clone(),
        })?;

    let header_prefix = tabs(OWNER_TABS + TTL_TABS);
    let mut out = format!(
        "$TTL {}\n@ IN SOA {} {}. (\n",
        zone.ttl,
        primary,
        zone.admin.replace('@', ".")
    );

    let mut soa_line = |value: &str, comment: &str| {
        out.push_str(&header_prefix);
        out.push_str(&pad(value, HEADER_COMMENT_TABS));
        out.push_str("; ");
        out.push_str(comment);
        out.push('\n');
    };

    if let Some(serial) = serial {
        soa_line(&serial.to_string(), "Serial");
    }
    soa_line(&zone.refresh, "Refresh");
    soa_line(&zone.retry, "Retry");
    soa_line(&zone.expire, "Expire");
    soa_line(&format!("{} )", zone.negative_ttl), "Negative Cache TTL");
    out.push('\n');

    for record_type in RecordType::ALL {
        let mut any = false;
        for record in zone.records_of(record_type) {
            any = true;
            render_record(&mut out, record);
        }
        if any {
            out.push('\n');
        }
    }

    let mut out = out.trim_end().to_string();
    out.push('\n');
    Ok(out)
}

fn render_record(out: &mut String, record: &ZoneRecord) {
    out.push_str(&pad(record.owner.as_deref().unwrap_or("@"), OWNER_TABS));
    out.push_str(&pad(record.ttl.as_deref().unwrap_or(""), TTL_TABS));
    out.push_str(record.record_type().zone_token());

    match &record.data {
        RecordData::Mx { priority, exchange } => {
            out.push_str(&format!(" {}\t\t{}", priority, exchange));
        }
        // CNAME is one character wider than the others, so one tab fewer.
        RecordData::Cname(target) => {
            out.push_str("\t\t");
            out.push_str(target);
        }
        RecordData::Ns(value) | RecordData::A(value) => {
            out.push_str("\t\t\t");
            out.push_str(value);
        }
        RecordData::Spf(value) | RecordData::Txt(value) => {
            out.push_str(&format!("\t\t\t\"{}\"", value));
        }
    }
    out.push('\n');
}

/// Pads `value` with tabs up to a column `width` tabs wide. Values that do not fit
/// (or leave less than one tab stop free) get a single separating tab.
fn pad(value: &str, width: usize) -> String {
    let free = (width * TAB_SIZE) as isize - value.len() as isize;
    if free < TAB_SIZE as isize {
        return format!("{}{}", value, TAB);
    }

    let free = free as usize;
    let mut count = free / TAB_SIZE;
    // An unaligned value needs one tab to reach the next stop first.
    if free % TAB_SIZE > 0 {
        count += 1;
    }
    format!("{}{}", value, tabs(count))
}

fn tabs(count: usize) -> String {
    std::iter::repeat_n(TAB, count).collect()
}
