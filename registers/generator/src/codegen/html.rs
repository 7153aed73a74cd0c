// Licensed under the Apache-2.0 license

//! HTML documentation of a register map: a standalone page and a bare table
//! for inclusion in other documents.

use super::RegisterCodeGenerator;
use crate::model::{Register, RegisterList};
use crate::provenance::Banner;
use crate::util::{hex_const, html_escape};
use std::fmt::Write;

/// File name of the stylesheet linked from every page.
pub const HTML_STYLESHEET_NAME: &str = "regs_style.css";

/// Content of [`HTML_STYLESHEET_NAME`].
pub const HTML_STYLESHEET: &str = "\
table.regs {
  border-collapse: collapse;
  font-family: sans-serif;
}

table.regs th, table.regs td {
  border: 1px solid #a0a0a0;
  padding: 4px 8px;
  text-align: left;
  vertical-align: top;
}

table.regs th {
  background-color: #e0e0e0;
}

table.regs tbody tr:nth-child(even) {
  background-color: #f4f4f4;
}

table.regs dl {
  margin: 0;
}

table.regs dt {
  font-weight: bold;
}

table.regs p.semantics {
  font-size: smaller;
}
";

/// Render the description text as paragraphs, with escaping.
fn description_html(text: &str) -> String {
    text.trim()
        .split("\n\n")
        .filter(|paragraph| !paragraph.trim().is_empty())
        .map(|paragraph| format!("<p>{}</p>", html_escape(paragraph.trim())))
        .collect()
}

fn bits_html(register: &Register) -> String {
    if register.bits().is_empty() {
        return String::new();
    }
    let mut html = String::from("<dl>");
    for bit in register.bits() {
        write!(
            html,
            "<dt>{} &ndash; {}</dt><dd>{}</dd>",
            bit.index(),
            html_escape(bit.name()),
            description_html(bit.description())
        )
        .unwrap();
    }
    html.push_str("</dl>");
    html
}

/// Mode name, followed by what bus accesses do for the pulse modes.
fn mode_html(register: &Register) -> String {
    match register.mode().semantics() {
        Some(semantics) => format!(
            "{}<p class=\"semantics\">{}</p>",
            register.mode_readable(),
            html_escape(semantics)
        ),
        None => register.mode_readable().to_string(),
    }
}

fn table(register_list: &RegisterList) -> String {
    let mut output = String::new();
    writeln!(output, "<table class=\"regs\">").unwrap();
    writeln!(output, "<thead>").unwrap();
    writeln!(
        output,
        "<tr><th>Address</th><th>Name</th><th>Mode</th><th>Description</th><th>Bits</th></tr>"
    )
    .unwrap();
    writeln!(output, "</thead>").unwrap();
    writeln!(output, "<tbody>").unwrap();
    for register in register_list {
        writeln!(
            output,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            hex_const(register.address() as u64),
            html_escape(register.name()),
            mode_html(register),
            description_html(register.description()),
            bits_html(register)
        )
        .unwrap();
    }
    writeln!(output, "</tbody>").unwrap();
    writeln!(output, "</table>").unwrap();
    output
}

/// Complete HTML document with title, banner and register table.
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlPageGenerator;

impl RegisterCodeGenerator for HtmlPageGenerator {
    fn file_name(&self, module_name: &str) -> String {
        format!("{module_name}_regs.html")
    }

    fn render(&self, register_list: &RegisterList, banner: &Banner) -> String {
        let title = format!("Register map of {}", html_escape(register_list.name()));
        let mut output = String::new();

        writeln!(output, "<!DOCTYPE html>").unwrap();
        writeln!(output, "<html>").unwrap();
        writeln!(output, "<head>").unwrap();
        writeln!(output, "<meta charset=\"utf-8\">").unwrap();
        writeln!(output, "<title>{title}</title>").unwrap();
        writeln!(
            output,
            "<link rel=\"stylesheet\" href=\"{HTML_STYLESHEET_NAME}\">"
        )
        .unwrap();
        writeln!(output, "</head>").unwrap();
        writeln!(output, "<body>").unwrap();
        writeln!(output, "<h1>{title}</h1>").unwrap();
        for line in banner.lines() {
            writeln!(output, "<p>{}</p>", html_escape(&line)).unwrap();
        }
        output.push_str(&table(register_list));
        writeln!(output, "</body>").unwrap();
        writeln!(output, "</html>").unwrap();
        output
    }
}

/// Only the register table, preceded by the banner as an HTML comment.
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlTableGenerator;

impl RegisterCodeGenerator for HtmlTableGenerator {
    fn file_name(&self, module_name: &str) -> String {
        format!("{module_name}_regs_table.html")
    }

    fn render(&self, register_list: &RegisterList, banner: &Banner) -> String {
        let mut output = String::new();
        writeln!(output, "<!--").unwrap();
        for line in banner.lines() {
            writeln!(output, "  {}", line.replace("--", "- -")).unwrap();
        }
        writeln!(output, "-->").unwrap();
        output.push_str(&table(register_list));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Mode;

    fn register_list() -> RegisterList {
        let mut register_list = RegisterList::new("test", None);
        let register = register_list.append("conf", Mode::ReadWrite).unwrap();
        register.set_description("Set <a> & \"b\".\n\nSecond paragraph.");
        register.append_bit("enable", "Enable the core.").unwrap();
        register_list.append("status", Mode::Read).unwrap();
        register_list
    }

    #[test]
    fn test_page() {
        let code = HtmlPageGenerator.render(&register_list(), &Banner::default());
        println!("{code}");
        assert!(code.starts_with("<!DOCTYPE html>\n"));
        assert!(code.contains("<link rel=\"stylesheet\" href=\"regs_style.css\">\n"));
        assert!(code.contains("<title>Register map of test</title>"));
        assert!(code.contains("<p>This file is automatically generated"));
        assert!(code.contains(
            "<tr><td>0x0</td><td>conf</td><td>Read, Write</td>\
             <td><p>Set &lt;a&gt; &amp; &quot;b&quot;.</p><p>Second paragraph.</p></td>\
             <td><dl><dt>0 &ndash; enable</dt><dd><p>Enable the core.</p></dd></dl></td></tr>\n"
        ));
        assert!(code.contains("<tr><td>0x4</td><td>status</td><td>Read</td><td></td><td></td></tr>\n"));
        assert!(code.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_pulse_modes() {
        let mut register_list = RegisterList::new("test", None);
        register_list.append("trigger", Mode::WritePulse).unwrap();
        register_list.append("irq", Mode::ReadWritePulse).unwrap();
        let code = HtmlTableGenerator.render(&register_list, &Banner::default());
        assert!(code.contains(
            "<td>Write-pulse<p class=\"semantics\">Written '1's are asserted for one clock cycle \
             in the FPGA logic. The written value is not stored.</p></td>"
        ));
        assert!(code.contains(
            "<td>Read, Write-pulse<p class=\"semantics\">Reads return status latched by the FPGA \
             logic. Written '1's are asserted for one clock cycle and clear the corresponding \
             status bits.</p></td>"
        ));
    }

    #[test]
    fn test_table() {
        let code = HtmlTableGenerator.render(&register_list(), &Banner::default());
        assert!(code.starts_with("<!--\n  This file is automatically generated"));
        assert!(!code.contains("<html>"));
        assert_eq!(code.matches("<tbody>").count(), 1);
        assert!(code.trim_end().ends_with("</table>"));
    }

    #[test]
    fn test_stylesheet_covers_table_class() {
        assert!(HTML_STYLESHEET.contains("table.regs"));
        assert!(HTML_STYLESHEET.contains("p.semantics"));
    }
}
