pub mod meta_commands;
pub mod repl;
pub mod statements;

pub const PAGE_SIZE: usize = 256;
pub const VIRTUAL_PAGES: usize = 16;
pub const PHYSICAL_FRAMES: usize = 8;

pub type Vm = paging::PagingEngine<PAGE_SIZE, VIRTUAL_PAGES, PHYSICAL_FRAMES>;
