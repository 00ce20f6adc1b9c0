//! End-to-end grouping runs against a temporary solution directory.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use u_regroup::cp::{BacktrackSolver, CpSolver, SolutionCollector, SolverStatus};
use u_regroup::cp::{Assignment, SolverConfig};
use u_regroup::graph::{parse_adjlist, PairGraph, ParticipantGraph};
use u_regroup::grouping::{
    GroupingConfig, GroupingModel, PairingModel, Partition, StatusClass,
};

fn people(names: &[&str]) -> ParticipantGraph {
    let mut g = ParticipantGraph::new();
    for name in names {
        g.add_node(*name);
    }
    g
}

fn read_groups(path: &Path) -> Vec<Vec<String>> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| line.split(' ').map(str::to_string).collect())
        .collect()
}

fn together(groups: &[Vec<String>], a: &str, b: &str) -> bool {
    groups
        .iter()
        .any(|g| g.iter().any(|m| m == a) && g.iter().any(|m| m == b))
}

#[test]
fn four_people_in_pairs() {
    let tmp = TempDir::new().unwrap();
    let model = GroupingModel::new(
        &people(&["A", "B", "C", "D"]),
        tmp.path(),
        GroupingConfig::default(),
    )
    .unwrap();

    let report = model.solve(&BacktrackSolver::new(), 1).unwrap();
    assert_eq!(report.class(), StatusClass::Solved);
    assert_eq!(report.solutions_found, 1);

    let groups = read_groups(&tmp.path().join("0"));
    assert_eq!(groups.len(), 2);
    assert!(groups.iter().all(|g| g.len() == 2));
    let members: BTreeSet<&String> = groups.iter().flatten().collect();
    assert_eq!(members.len(), 4);
}

#[test]
fn hierarchy_pair_never_grouped() {
    let tmp = TempDir::new().unwrap();
    let rows = parse_adjlist("M E\nA\nB\nC\nD\n".as_bytes()).unwrap();
    let graph = ParticipantGraph::from_rows(rows);

    let model = GroupingModel::new(&graph, tmp.path(), GroupingConfig::default()).unwrap();
    let report = model.solve(&BacktrackSolver::new(), 0).unwrap();

    assert_eq!(report.status, SolverStatus::Optimal);
    // 15 perfect matchings of six people, 3 of which pair M with E
    assert_eq!(report.solutions_found, 12);
    for (index, file) in report.files.iter().enumerate() {
        assert_eq!(file, &tmp.path().join(format!("0_{index}")));
        let groups = read_groups(file);
        assert_eq!(groups.len(), 3);
        assert!(!together(&groups, "M", "E"));
    }
}

#[test]
fn history_pair_never_repeated() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("0"), "A B\nC D\n").unwrap();

    let model = GroupingModel::new(
        &people(&["A", "B", "C", "D"]),
        tmp.path(),
        GroupingConfig::default().with_historical_solution_limit(1),
    )
    .unwrap();
    let report = model.solve(&BacktrackSolver::new(), 0).unwrap();

    assert_eq!(report.solution_name, "1");
    assert_eq!(report.solutions_found, 2);
    for file in &report.files {
        let groups = read_groups(file);
        assert!(!together(&groups, "A", "B"));
        assert!(!together(&groups, "C", "D"));
    }
}

#[test]
fn history_outside_limit_is_ignored() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("0"), "A B\nC D\n").unwrap();
    fs::write(tmp.path().join("1"), "A C\nB D\n").unwrap();

    let model = GroupingModel::new(
        &people(&["A", "B", "C", "D"]),
        tmp.path(),
        GroupingConfig::default().with_historical_solution_limit(1),
    )
    .unwrap();
    let report = model.solve(&BacktrackSolver::new(), 0).unwrap();

    // Only run 1 is excluded: {AB, CD} and {AD, BC} remain.
    assert_eq!(report.solutions_found, 2);
    let outputs: BTreeSet<String> = report
        .files
        .iter()
        .map(|f| fs::read_to_string(f).unwrap())
        .collect();
    assert!(outputs.contains("A B\nC D\n"));
    assert!(outputs.contains("A D\nB C\n"));
}

#[test]
fn exhausted_history_is_infeasible() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("0"), "A B\nC D\n").unwrap();
    fs::write(tmp.path().join("1"), "A C\nB D\n").unwrap();
    fs::write(tmp.path().join("2"), "# all pairings used\nA D\nB C\n").unwrap();

    let model = GroupingModel::new(
        &people(&["A", "B", "C", "D"]),
        tmp.path(),
        GroupingConfig::default(),
    )
    .unwrap();
    let report = model.solve(&BacktrackSolver::new(), 1).unwrap();

    assert_eq!(report.status, SolverStatus::Infeasible);
    assert_eq!(report.class(), StatusClass::Unsolved);
    assert!(report.files.is_empty());
    assert!(!tmp.path().join("3").exists());
}

#[test]
fn every_solution_is_a_partition() {
    let names = ["A", "B", "C", "D", "E", "F", "G"];
    let model = PairingModel::build(&people(&names), 3, &PairGraph::new()).unwrap();

    let mut collector = SolutionCollector::new();
    let outcome = BacktrackSolver::new()
        .search_all(model.cp_model(), &SolverConfig::default(), &mut collector)
        .unwrap();
    assert_eq!(outcome.status, SolverStatus::Optimal);
    // choose the group of three; the other four form the second group
    assert_eq!(collector.solutions.len(), 35);

    for values in &collector.solutions {
        let partition = Partition::from_assignment(&model, &Assignment::new(values));
        let mut sizes: Vec<usize> = partition.groups().iter().map(Vec::len).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![3, 4]);

        let members: Vec<&String> = partition.groups().iter().flatten().collect();
        assert_eq!(members.len(), names.len());
        let unique: BTreeSet<&String> = members.into_iter().collect();
        assert_eq!(unique.len(), names.len());
    }
}

#[test]
fn remainder_group_of_two() {
    let names = ["A", "B", "C", "D", "E", "F", "G", "H"];
    let model = PairingModel::build(&people(&names), 3, &PairGraph::new()).unwrap();

    let mut collector = SolutionCollector::with_limit(20);
    BacktrackSolver::new()
        .search_all(model.cp_model(), &SolverConfig::default(), &mut collector)
        .unwrap();
    assert_eq!(collector.solutions.len(), 20);

    for values in &collector.solutions {
        let partition = Partition::from_assignment(&model, &Assignment::new(values));
        let mut sizes: Vec<usize> = partition.groups().iter().map(Vec::len).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![2, 3, 3]);
    }
}

#[test]
fn seeded_runs_are_reproducible() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let graph = people(&["A", "B", "C", "D", "E", "F"]);
    let config = GroupingConfig::default().with_seed(2024);

    for dir in [&first, &second] {
        GroupingModel::new(&graph, dir.path(), config.clone())
            .unwrap()
            .solve(&BacktrackSolver::new(), 1)
            .unwrap();
    }

    assert_eq!(
        fs::read_to_string(first.path().join("0")).unwrap(),
        fs::read_to_string(second.path().join("0")).unwrap()
    );
}

#[test]
fn consecutive_runs_rotate() {
    let tmp = TempDir::new().unwrap();
    let graph = people(&["A", "B", "C", "D"]);

    for expected in ["0", "1", "2"] {
        let model = GroupingModel::new(&graph, tmp.path(), GroupingConfig::default()).unwrap();
        let report = model.solve(&BacktrackSolver::new(), 1).unwrap();
        assert_eq!(report.solution_name, expected);
        assert_eq!(report.solutions_found, 1);
    }

    let outputs: BTreeSet<String> = ["0", "1", "2"]
        .iter()
        .map(|name| fs::read_to_string(tmp.path().join(name)).unwrap())
        .collect();
    assert_eq!(outputs.len(), 3);

    // Every pairing of four people has been used.
    let model = GroupingModel::new(&graph, tmp.path(), GroupingConfig::default()).unwrap();
    let report = model.solve(&BacktrackSolver::new(), 1).unwrap();
    assert_eq!(report.status, SolverStatus::Infeasible);
}

#[test]
fn excluded_manager_frees_their_reports() {
    let tmp = TempDir::new().unwrap();
    let rows = parse_adjlist("# org\nM E F\nA\nB\nC\nD\n".as_bytes()).unwrap();
    let mut participants = ParticipantGraph::from_rows(rows);
    let excluded = PairGraph::from_rows(parse_adjlist("M\nGhost\n".as_bytes()).unwrap());

    let skipped = participants.remove_excluded(&excluded);
    assert_eq!(skipped, vec!["Ghost".to_string()]);
    assert_eq!(participants.node_count(), 6);
    assert_eq!(participants.edge_count(), 0);

    let model = GroupingModel::new(&participants, tmp.path(), GroupingConfig::default()).unwrap();
    let report = model.solve(&BacktrackSolver::new(), 0).unwrap();

    // every perfect matching of six people
    assert_eq!(report.status, SolverStatus::Optimal);
    assert_eq!(report.solutions_found, 15);

    let mut partners = BTreeSet::new();
    for file in &report.files {
        let groups = read_groups(file);
        assert!(groups.iter().flatten().all(|m| m != "M" && m != "Ghost"));
        for other in ["A", "B", "C", "D", "F"] {
            if together(&groups, "E", other) {
                partners.insert(other);
            }
        }
    }
    assert_eq!(partners.len(), 5);
}
