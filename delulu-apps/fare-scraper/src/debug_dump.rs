//!  Delulu Travel Agent
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Debug dumps of the rendered booking page.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

pub fn dump_file_name(now: DateTime<Local>) -> String {
    format!("dump-{}.html", now.format("%Y%m%d-%H%M%S"))
}

/// Write `markup` (trimmed) to `dir/dump-<YYYYMMDD-HHMMSS>.html`.
pub fn write_page_dump(
    dir: &Path,
    markup: &str,
    now: DateTime<Local>,
) -> std::io::Result<PathBuf> {
    let path = dir.join(dump_file_name(now));
    std::fs::write(&path, markup.trim())?;
    Ok(path)
}
