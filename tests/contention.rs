use spooloslib::resources::{DiskId, FileExtent, PrinterId};
use spooloslib::simulation::Simulation;
use spooloslib::tasks::Command;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::timeout;

mod common;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn more_writers_than_disks() -> Result<(), Box<dyn std::error::Error>> {
    common::_init_logging();

    let users = 6;
    let sim = Simulation::new(common::_fast_config(users, 2, 2))?;

    let mut expected: HashMap<String, Vec<String>> = HashMap::new();
    let mut scripts = vec![];
    for user in 0..users {
        let mut script: Vec<Command> = vec![];
        for file in 0..3 {
            let name = format!("u{}f{}", user, file);
            let lines = common::_lines_for(&name, 4 + user);
            script.extend(common::_save_and_print(&name, &lines));
            expected.insert(name, lines);
        }
        scripts.push(script);
    }

    let report = timeout(Duration::from_secs(60), sim.run_commands(scripts)).await??;

    //Every writer got through its script even though only two could hold a disk at once
    assert_eq!(report.writers.len(), users);
    for writer in &report.writers {
        match writer {
            Ok(w) => {
                assert_eq!(w.files_saved.len(), 3);
                assert!(w.files_aborted.is_empty());
            }
            Err(e) => panic!("Writer failed {}", e),
        }
    }

    //Nothing is left checked out
    let dm = sim.disk_manager();
    let first = timeout(Duration::from_secs(5), dm.request_disk()).await?;
    let second = timeout(Duration::from_secs(5), dm.request_disk()).await?;
    dm.release_disk(first.id()).await?;
    dm.release_disk(second.id()).await?;
    assert_eq!(sim.printer_manager().free_printers().await, 2);

    //Files on the same disk never share a sector
    let extents: Vec<&FileExtent> = report.directory.iter().map(|(_, e)| e).collect();
    assert_eq!(extents.len(), expected.len());
    for (i, a) in extents.iter().enumerate() {
        for b in extents.iter().skip(i + 1) {
            assert!(!a.overlaps(b), "{} overlaps {}", a, b);
        }
    }

    //And each extent holds exactly what its writer wrote
    for (name, extent) in &report.directory {
        let disk = &report.disks[extent.disk_id.0];
        let stored: Vec<String> = extent.sectors().map(|s| disk[s.0].clone()).collect();
        assert_eq!(&stored, &expected[name]);
    }

    //Every print job printed its whole file
    assert_eq!(report.print_jobs.len(), expected.len());
    let mut printed_total = 0;
    for job in &report.print_jobs {
        match job {
            Ok(receipt) => {
                assert_eq!(receipt.lines_printed, expected[&receipt.file_name].len());
                printed_total += receipt.lines_printed;
            }
            Err(e) => panic!("Print job failed {}", e),
        }
    }

    let mut on_printers = 0;
    for id in 0..2 {
        let lines = sim
            .printer_manager()
            .get_printer(PrinterId(id))?
            .printed_lines()
            .await;
        on_printers += lines.len();
    }
    assert_eq!(on_printers, printed_total);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn single_disk_is_shared_in_turn() -> Result<(), Box<dyn std::error::Error>> {
    common::_init_logging();

    let sim = Simulation::new(common::_fast_config(4, 1, 1))?;
    let scripts = (0..4)
        .map(|user| {
            let name = format!("only{}", user);
            let lines = common::_lines_for(&name, 5);
            common::_save_and_print(&name, &lines)
        })
        .collect();

    let report = timeout(Duration::from_secs(60), sim.run_commands(scripts)).await??;
    assert!(report.writers.iter().all(|w| w.is_ok()));

    //One disk, four files of five lines, packed back to back in some order
    let mut starts: Vec<usize> = report
        .directory
        .iter()
        .map(|(_, e)| {
            assert_eq!(e.disk_id, DiskId(0));
            assert_eq!(e.length, 5);
            e.start_sector.0
        })
        .collect();
    starts.sort_unstable();
    assert_eq!(starts, vec![0, 5, 10, 15]);
    assert_eq!(report.disks[0].len(), 20);

    Ok(())
}
