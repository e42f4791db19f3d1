use std::fmt::Write;

use paging::PagingEngine;

#[derive(Debug, PartialEq, Eq)]
pub enum MetaCommand {
    Exit,
    Output(String),
}

#[derive(Debug, PartialEq, Eq)]
pub enum MetaCommandError {
    UnrecognizedCommand,
}

pub const HELP: &str = "\
statements:
  access <page>          make a page resident
  read <addr>            read one byte
  write <addr> <value>   write one byte (low 8 bits of value)
  flush                  write every dirty page back
meta commands:
  .table   page table
  .frames  physical frames, FIFO position and owner
  .stats   access counters
  .help    this text
  .exit    quit";

pub fn handle_meta_command<
    const PAGE_SIZE: usize,
    const VIRTUAL_PAGES: usize,
    const PHYSICAL_FRAMES: usize,
>(
    input: &str,
    vm: &PagingEngine<PAGE_SIZE, VIRTUAL_PAGES, PHYSICAL_FRAMES>,
) -> Result<MetaCommand, MetaCommandError> {
    match input.trim() {
        ".exit" => Ok(MetaCommand::Exit),
        ".help" => Ok(MetaCommand::Output(HELP.to_string())),
        ".table" => Ok(MetaCommand::Output(page_table(vm))),
        ".frames" => Ok(MetaCommand::Output(frames(vm))),
        ".stats" => Ok(MetaCommand::Output(stats(vm))),
        _ => Err(MetaCommandError::UnrecognizedCommand),
    }
}

fn page_table<const PAGE_SIZE: usize, const VIRTUAL_PAGES: usize, const PHYSICAL_FRAMES: usize>(
    vm: &PagingEngine<PAGE_SIZE, VIRTUAL_PAGES, PHYSICAL_FRAMES>,
) -> String {
    let mut out = String::from("page  present  frame  dirty");
    for (page, entry) in vm.page_table().iter() {
        let frame = entry
            .frame()
            .map(|f| f.to_string())
            .unwrap_or_else(|| String::from("-"));
        let _ = write!(
            out,
            "\n{:>4}  {:>7}  {:>5}  {:>5}",
            page,
            entry.is_present(),
            frame,
            entry.is_dirty()
        );
    }
    out
}

fn frames<const PAGE_SIZE: usize, const VIRTUAL_PAGES: usize, const PHYSICAL_FRAMES: usize>(
    vm: &PagingEngine<PAGE_SIZE, VIRTUAL_PAGES, PHYSICAL_FRAMES>,
) -> String {
    let order: Vec<usize> = vm.fifo_order().collect();
    let mut out = String::from("frame  fifo  page");
    for frame in 0..PHYSICAL_FRAMES {
        let _ = match (vm.frame_owner(frame), order.iter().position(|&f| f == frame)) {
            (Some(page), Some(position)) => {
                write!(out, "\n{:>5}  {:>4}  {:>4}", frame, position, page)
            }
            _ => write!(out, "\n{:>5}  {:>4}  {:>4}", frame, "-", "free"),
        };
    }
    out
}

fn stats<const PAGE_SIZE: usize, const VIRTUAL_PAGES: usize, const PHYSICAL_FRAMES: usize>(
    vm: &PagingEngine<PAGE_SIZE, VIRTUAL_PAGES, PHYSICAL_FRAMES>,
) -> String {
    let stats = vm.stats();
    format!(
        "accesses: {}\nhits: {}\nfaults: {}\nevictions: {}\nwritebacks: {}\nfree frames: {}",
        stats.accesses,
        stats.hits,
        stats.faults,
        stats.evictions,
        stats.writebacks,
        vm.free_frame_count()
    )
}
