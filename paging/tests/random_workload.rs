use std::collections::VecDeque;

use paging::PagingEngine;
use rand::{rngs::StdRng, Rng, SeedableRng};

const PAGE_SIZE: usize = 64;
const VIRTUAL_PAGES: usize = 12;
const PHYSICAL_FRAMES: usize = 4;

type Vm = PagingEngine<PAGE_SIZE, VIRTUAL_PAGES, PHYSICAL_FRAMES>;

/// What the engine should look like from the outside.
struct Model {
    bytes: Vec<u8>,
    resident: VecDeque<usize>,
}

impl Model {
    fn new() -> Self {
        Self {
            bytes: vec![0; PAGE_SIZE * VIRTUAL_PAGES],
            resident: VecDeque::new(),
        }
    }

    fn touch(&mut self, page: usize) {
        if self.resident.contains(&page) {
            return;
        }
        if self.resident.len() == PHYSICAL_FRAMES {
            self.resident.pop_front();
        }
        self.resident.push_back(page);
    }
}

fn check_invariants(vm: &Vm, model: &Model) {
    let order: Vec<usize> = vm.fifo_order().collect();
    assert_eq!(order.len() + vm.free_frame_count(), PHYSICAL_FRAMES);

    for frame in 0..PHYSICAL_FRAMES {
        let owned = vm.frame_owner(frame).is_some();
        assert_ne!(vm.memory().is_free(frame), owned, "frame {}", frame);
        assert_eq!(order.contains(&frame), owned, "frame {}", frame);
    }

    for (page, entry) in vm.page_table().iter() {
        match entry.frame() {
            Some(frame) => assert_eq!(vm.frame_owner(frame), Some(page)),
            None => assert!(!entry.is_dirty()),
        }
    }

    let pages: Vec<usize> = order.iter().map(|&f| vm.frame_owner(f).unwrap()).collect();
    assert_eq!(pages, model.resident.iter().copied().collect::<Vec<_>>());
}

fn run(seed: u64, steps: usize) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut vm = Vm::new();
    let mut model = Model::new();

    for _ in 0..steps {
        let address = rng.gen_range(0..PAGE_SIZE * VIRTUAL_PAGES);
        let page = address / PAGE_SIZE;
        match rng.gen_range(0..10) {
            0..=3 => {
                let value: u8 = rng.gen();
                vm.write_byte(address, value).unwrap();
                model.bytes[address] = value;
                model.touch(page);
                assert!(vm.entry(page).unwrap().is_dirty());
            }
            4..=7 => {
                assert_eq!(vm.read_byte(address).unwrap(), model.bytes[address]);
                model.touch(page);
            }
            8 => {
                vm.ensure_resident(page).unwrap();
                model.touch(page);
            }
            _ => {
                vm.flush().unwrap();
                for (_, entry) in vm.page_table().iter() {
                    assert!(!entry.is_dirty());
                }
            }
        }
        check_invariants(&vm, &model);
    }

    let stats = vm.stats();
    assert_eq!(stats.accesses, stats.hits + stats.faults);
    assert_eq!(stats.faults, stats.evictions + PHYSICAL_FRAMES as u64);
}

#[test]
fn random_workload_matches_model() {
    for seed in 0..8 {
        run(seed, 2_000);
    }
}

#[test]
fn backing_store_matches_model_after_flush() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut vm = Vm::new();
    let mut expected = vec![0u8; PAGE_SIZE * VIRTUAL_PAGES];

    for _ in 0..500 {
        let address = rng.gen_range(0..expected.len());
        let value: u8 = rng.gen();
        vm.write_byte(address, value).unwrap();
        expected[address] = value;
    }
    vm.flush().unwrap();

    for page in 0..VIRTUAL_PAGES {
        let block = vm.backing_block(page).unwrap();
        assert_eq!(&block[..], &expected[page * PAGE_SIZE..(page + 1) * PAGE_SIZE]);
    }
}
