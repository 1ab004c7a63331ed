// SPDX-License-Identifier:  MIT

use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;

use crate::error::IfcfgError;

pub fn hwaddr_valid<T: ToString>(hwaddr: &T) -> bool {
    use std::num::ParseIntError;

    let hwaddr_length_as_str = 17;
    let addr = hwaddr.to_string();

    if !addr.is_ascii() {
        return false;
    }

    if addr.len() != hwaddr_length_as_str {
        return false;
    }

    let bytes: Vec<Result<u8, ParseIntError>> = addr
        .split(':')
        .map(|s| u8::from_str_radix(s, 16))
        .collect();

    bytes.len() == 6 && bytes.iter().all(|b| b.is_ok())
}

/// Returns the first line of the file at `path`, without the line terminator.
pub fn get_cmdline_from_file<P: AsRef<Path>>(path: P) -> Result<String, IfcfgError> {
    let path = path.as_ref();
    let read_error = |source| IfcfgError::InputRead {
        path: path.to_path_buf(),
        source,
    };

    let mut f = BufReader::new(File::open(path).map_err(read_error)?);
    let mut buf = Vec::new();

    f.read_until(b'\n', &mut buf).map_err(read_error)?;

    // non UTF-8 bytes become U+FFFD, the rest of the line stays usable
    let line = String::from_utf8_lossy(&buf);

    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Command line given as program arguments, if any, overrides the boot parameter file.
pub fn cmdline_from_args<I: IntoIterator<Item = String>>(args: I) -> Option<String> {
    let args: Vec<String> = args.into_iter().collect();

    if args.is_empty() {
        return None;
    }

    Some(args.join(" "))
}

pub fn exit_with(exit_code: i32) -> ! {
    std::process::exit(exit_code)
}
