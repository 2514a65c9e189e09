use crate::CombRef;
use ptree::{print_tree, Style, TreeItem};
use std::borrow::Cow;
use std::io;
use std::io::Write;

#[derive(Clone)]
/// A printable view of a combinator tree for grammar debugging.
pub struct CombTree(pub CombRef);

impl CombTree {
    /// Print the combinator tree to the standard output.
    pub fn print(&self) -> io::Result<()> {
        print_tree(self)
    }
}

impl TreeItem for CombTree {
    type Child = Self;

    fn write_self<W: Write>(&self, f: &mut W, _: &Style) -> io::Result<()> {
        write!(f, "{} # {}", self.0, self.0.helper().kind())
    }

    fn children(&self) -> Cow<[Self::Child]> {
        Cow::from(
            self.0
                .children()
                .into_iter()
                .map(CombTree)
                .collect::<Vec<CombTree>>(),
        )
    }
}
