use std::cmp::Ordering;

use cursive::{
    view::{Nameable, Resizable},
    views::{Button, Dialog, DummyView, EditView, LinearLayout, TextView},
    Cursive,
};
use cursive_table_view::{TableView, TableViewItem};
use paging::Stats;
use paging_sim::{statements::Statement, Vm, PHYSICAL_FRAMES};

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
enum PageColumn {
    Page,
    Present,
    Frame,
    Dirty,
}

#[derive(Debug, Clone)]
struct PageRow {
    page: usize,
    frame: Option<usize>,
    dirty: bool,
}

impl TableViewItem<PageColumn> for PageRow {
    fn to_column(&self, column: PageColumn) -> String {
        match column {
            PageColumn::Page => self.page.to_string(),
            PageColumn::Present => self.frame.is_some().to_string(),
            PageColumn::Frame => self.frame.map_or_else(|| String::from("-"), |f| f.to_string()),
            PageColumn::Dirty => self.dirty.to_string(),
        }
    }

    fn cmp(&self, other: &Self, column: PageColumn) -> Ordering
    where
        Self: Sized,
    {
        match column {
            PageColumn::Page => self.page.cmp(&other.page),
            PageColumn::Present => self.frame.is_some().cmp(&other.frame.is_some()),
            PageColumn::Frame => self.frame.cmp(&other.frame),
            PageColumn::Dirty => self.dirty.cmp(&other.dirty),
        }
    }
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
enum FrameColumn {
    Frame,
    Fifo,
    Page,
}

#[derive(Debug, Clone)]
struct FrameRow {
    frame: usize,
    fifo: Option<usize>,
    page: Option<usize>,
}

impl TableViewItem<FrameColumn> for FrameRow {
    fn to_column(&self, column: FrameColumn) -> String {
        match column {
            FrameColumn::Frame => self.frame.to_string(),
            FrameColumn::Fifo => self.fifo.map_or_else(|| String::from("-"), |p| p.to_string()),
            FrameColumn::Page => self.page.map_or_else(|| String::from("free"), |p| p.to_string()),
        }
    }

    fn cmp(&self, other: &Self, column: FrameColumn) -> Ordering
    where
        Self: Sized,
    {
        match column {
            FrameColumn::Frame => self.frame.cmp(&other.frame),
            FrameColumn::Fifo => self.fifo.cmp(&other.fifo),
            FrameColumn::Page => self.page.cmp(&other.page),
        }
    }
}

fn make_page_table() -> TableView<PageRow, PageColumn> {
    let mut table = TableView::<PageRow, PageColumn>::new();
    let columns = [
        (PageColumn::Page, "page"),
        (PageColumn::Present, "present"),
        (PageColumn::Frame, "frame"),
        (PageColumn::Dirty, "dirty"),
    ];
    for (i, (column, title)) in columns.into_iter().enumerate() {
        table.insert_column(i, column, title, |c| c);
    }
    table
}

fn make_frame_table() -> TableView<FrameRow, FrameColumn> {
    let mut table = TableView::<FrameRow, FrameColumn>::new();
    let columns = [
        (FrameColumn::Frame, "frame"),
        (FrameColumn::Fifo, "fifo"),
        (FrameColumn::Page, "page"),
    ];
    for (i, (column, title)) in columns.into_iter().enumerate() {
        table.insert_column(i, column, title, |c| c);
    }
    table
}

fn page_rows(vm: &Vm) -> Vec<PageRow> {
    vm.page_table()
        .iter()
        .map(|(page, entry)| PageRow {
            page,
            frame: entry.frame(),
            dirty: entry.is_dirty(),
        })
        .collect()
}

fn frame_rows(vm: &Vm) -> Vec<FrameRow> {
    let order: Vec<usize> = vm.fifo_order().collect();
    (0..PHYSICAL_FRAMES)
        .map(|frame| FrameRow {
            frame,
            fifo: order.iter().position(|&f| f == frame),
            page: vm.frame_owner(frame),
        })
        .collect()
}

fn format_stats(stats: Stats, free_frames: usize) -> String {
    format!(
        "accesses {}  hits {}  faults {}  evictions {}  writebacks {}  free frames {}",
        stats.accesses, stats.hits, stats.faults, stats.evictions, stats.writebacks, free_frames
    )
}

fn refresh(s: &mut Cursive) {
    let Some((pages, frames, stats)) = s.with_user_data(|vm: &mut Vm| {
        (
            page_rows(vm),
            frame_rows(vm),
            format_stats(vm.stats(), vm.free_frame_count()),
        )
    }) else {
        return;
    };
    s.call_on_name("pages", |view: &mut TableView<PageRow, PageColumn>| {
        view.set_items(pages)
    });
    s.call_on_name("frames", |view: &mut TableView<FrameRow, FrameColumn>| {
        view.set_items(frames)
    });
    s.call_on_name("stats", |view: &mut TextView| view.set_content(stats));
}

fn on_command(s: &mut Cursive, line: &str) {
    let result = s.with_user_data(|vm: &mut Vm| {
        Statement::prepare(line).and_then(|statement| statement.execute(vm))
    });
    let message = match result {
        Some(Ok(text)) => text,
        Some(Err(e)) => e.to_string(),
        None => return,
    };
    s.call_on_name("status", |view: &mut TextView| view.set_content(message));
    s.call_on_name("command", |view: &mut EditView| {
        let _ = view.set_content("");
    });
    refresh(s);
}

fn main() {
    let mut siv = cursive::default();
    siv.set_user_data(Vm::new());
    siv.add_global_callback(cursive::event::Key::Esc, |s| s.quit());

    let tables = LinearLayout::horizontal()
        .child(
            Dialog::around(make_page_table().with_name("pages").min_size((40, 18)))
                .title("Page table"),
        )
        .child(
            Dialog::around(make_frame_table().with_name("frames").min_size((30, 18)))
                .title("Frames"),
        );
    let controls = LinearLayout::horizontal()
        .child(TextView::new("> "))
        .child(EditView::new().on_submit(on_command).with_name("command").fixed_width(30))
        .child(DummyView)
        .child(Button::new("Flush", |s| on_command(s, "flush")))
        .child(Button::new("Quit", |s| s.quit()));

    siv.add_layer(
        Dialog::around(
            LinearLayout::vertical()
                .child(tables)
                .child(TextView::new("").with_name("stats"))
                .child(
                    TextView::new("access <page> | read <addr> | write <addr> <value>")
                        .with_name("status"),
                )
                .child(controls),
        )
        .title("Virtual memory"),
    );
    refresh(&mut siv);
    siv.run();
}
