//! Reference layout engine
//!
//! Turns a [`Doc`] into text for a given print width with the classic
//! fits-then-break strategy: a group is printed flat when everything up to
//! the next possible line break fits in the remaining width, and broken
//! otherwise. Groups containing a hard line always break.
//!
//! Both the printer and the fit check walk an explicit stack, so deeply
//! nested documents cannot overflow the call stack here.

use super::doc::Doc;
use crate::config::FormatOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Flat,
    Break,
}

/// Pending work: indentation, mode and document.
type Command<'a> = (usize, Mode, &'a Doc);

pub fn render(doc: &Doc, options: &FormatOptions) -> String {
    let width = options.print_width as isize;
    let mut out = String::new();
    let mut column = 0usize;
    let mut stack: Vec<Command> = vec![(0, Mode::Break, doc)];

    while let Some((ind, mode, doc)) = stack.pop() {
        match doc {
            Doc::Text(s) => {
                out.push_str(s);
                column += s.chars().count();
            }
            Doc::Concat(parts) => {
                for part in parts.iter().rev() {
                    stack.push((ind, mode, part));
                }
            }
            Doc::Indent(inner) => stack.push((ind + options.tab_width, mode, inner)),
            Doc::Group(inner) => {
                let flat = mode == Mode::Flat
                    || (!inner.contains_hard_line()
                        && fits(inner, &stack, width - column as isize));
                let mode = if flat { Mode::Flat } else { Mode::Break };
                stack.push((ind, mode, inner));
            }
            Doc::Line if mode == Mode::Flat => {
                out.push(' ');
                column += 1;
            }
            Doc::SoftLine if mode == Mode::Flat => {}
            Doc::Line | Doc::SoftLine | Doc::HardLine => {
                newline(&mut out, ind);
                column = ind;
            }
        }
    }

    trim_trailing_spaces(&mut out);
    out
}

/// Whether `doc` printed flat, plus whatever follows it on the same line,
/// fits in `remaining` columns.
fn fits(doc: &Doc, rest: &[Command], mut remaining: isize) -> bool {
    let mut rest_index = rest.len();
    let mut cmds: Vec<(Mode, &Doc)> = vec![(Mode::Flat, doc)];

    while remaining >= 0 {
        let Some((mode, doc)) = cmds.pop() else {
            if rest_index == 0 {
                return true;
            }
            rest_index -= 1;
            let (_, mode, doc) = rest[rest_index];
            cmds.push((mode, doc));
            continue;
        };

        match doc {
            Doc::Text(s) => remaining -= s.chars().count() as isize,
            Doc::Concat(parts) => {
                for part in parts.iter().rev() {
                    cmds.push((mode, part));
                }
            }
            Doc::Indent(inner) => cmds.push((mode, inner)),
            Doc::Group(inner) => {
                let mode = if mode == Mode::Break && inner.contains_hard_line() {
                    Mode::Break
                } else {
                    mode
                };
                cmds.push((mode, inner));
            }
            Doc::Line if mode == Mode::Flat => remaining -= 1,
            Doc::SoftLine if mode == Mode::Flat => {}
            Doc::Line | Doc::SoftLine | Doc::HardLine => return true,
        }
    }

    false
}

fn newline(out: &mut String, ind: usize) {
    trim_trailing_spaces(out);
    out.push('\n');
    out.extend(std::iter::repeat(' ').take(ind));
}

fn trim_trailing_spaces(out: &mut String) {
    let trimmed = out.trim_end_matches(' ').len();
    out.truncate(trimmed);
}
