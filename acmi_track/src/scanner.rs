/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

/// single pass scanner that turns an ACMI text buffer into logical lines.
/// Physical lines are LF terminated with an optional preceding CR. A physical line ending
/// with an unescaped backslash continues on the next physical line; the joined logical line
/// keeps a literal newline at the seam. Blank lines and `//` comments are skipped

use std::borrow::Cow;
use memchr::memchr;

#[derive(Debug)]
pub struct LogicalLine<'a> {
    pub text: Cow<'a,str>,
    pub line_no: usize, // 1-based number of the first physical line
}

pub struct LineScanner<'a> {
    text: &'a str,
    pos: usize,
    line_no: usize,
}

impl<'a> LineScanner<'a> {
    pub fn new (text: &'a str)->Self {
        let text = text.strip_prefix( '\u{feff}').unwrap_or( text); // optional BOM
        LineScanner { text, pos: 0, line_no: 0 }
    }

    pub fn line_no (&self)->usize { self.line_no }

    /// next physical line with the terminator removed, None at end of input
    pub fn next_physical (&mut self)->Option<&'a str> {
        if self.pos >= self.text.len() { return None }

        let start = self.pos;
        let end = match memchr( b'\n', &self.text.as_bytes()[start..]) {
            Some(i) => start + i,
            None => self.text.len()
        };
        self.pos = if end < self.text.len() { end + 1 } else { end };
        self.line_no += 1;

        let mut line = &self.text[start..end];
        if line.ends_with('\r') { line = &line[..line.len()-1] }
        Some(line)
    }

    /// next logical line: blank and comment lines skipped, continuation chains joined.
    /// Continuation lines are taken verbatim - only the first physical line of a logical
    /// line can be a comment
    pub fn next_logical (&mut self)->Option<LogicalLine<'a>> {
        loop {
            let line_no = self.line_no + 1;
            let line = self.next_physical()?;

            if line.trim().is_empty() { continue }
            if line.trim_start().starts_with("//") { continue }

            if !has_continuation( line) {
                return Some( LogicalLine { text: Cow::Borrowed(line), line_no })
            }

            // unbounded continuation chain
            let mut text = String::from( strip_continuation( line));
            while let Some(next) = self.next_physical() {
                text.push('\n');
                if has_continuation( next) {
                    text.push_str( strip_continuation( next));
                } else {
                    text.push_str( next);
                    break;
                }
            }
            return Some( LogicalLine { text: Cow::Owned(text), line_no })
        }
    }
}

/// a trailing backslash marks a continuation unless it is itself escaped
fn has_continuation (line: &str)->bool {
    let n = line.bytes().rev().take_while( |&b| b == b'\\').count();
    n % 2 == 1
}

fn strip_continuation (line: &str)->&str {
    &line[..line.len()-1]
}
