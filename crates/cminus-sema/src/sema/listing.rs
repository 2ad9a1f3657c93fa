//! Symbol table listing
//!
//! Fixed-column dump of every symbol, grouped by scope in creation order and,
//! within a scope, by hash bucket then chain order.

use std::fmt::Write as _;
use std::io;

use super::SymbolTable;

const HEADER: &str = "Variable Name  Variable Type  Scope Name  Location   Line Numbers";
const RULE: &str = "-------------  -------------  ----------  --------   ------------";

/// Render the listing as a string
pub fn render_listing(table: &SymbolTable) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');

    for (id, scope) in table.scopes() {
        for symbol in table.symbols_in(id) {
            let _ = write!(
                out,
                "{:<13}  {:<13}  {:<10}  {:<8}  ",
                symbol.name,
                symbol.ty.listing_name(),
                scope.name,
                symbol.slot
            );
            for line in &symbol.lines {
                let _ = write!(out, "{line:>4} ");
            }
            out.push('\n');
        }
    }
    out
}

/// Write the listing to `out`
pub fn write_listing(table: &SymbolTable, out: &mut impl io::Write) -> io::Result<()> {
    out.write_all(render_listing(table).as_bytes())
}
