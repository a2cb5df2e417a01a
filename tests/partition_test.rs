use std::collections::HashSet;

use colleague_affinity::model::condition::Criterion;
use colleague_affinity::{
    partition_teams, partition_teams_with_rng, AffinityError, GroupingCriteria, Member, PartitionConfig,
    RemainderPolicy, TeamPartitioner,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn population(departments: &[&str]) -> Vec<Member> {
    let personalities = ["INTJ", "ENFP", "ISTJ", "ESFP"];
    let locations = ["Tokyo", "Osaka", "Fukuoka", "Remote"];
    departments
        .iter()
        .enumerate()
        .map(|(i, d)| {
            Member::new(i as u64 + 1, format!("member{i}"))
                .with_department(*d)
                .with_personality(personalities[i % 4])
                .with_location(locations[i % 3])
        })
        .collect()
}

fn all_ids(members: &[Member]) -> HashSet<u64> {
    members.iter().map(|m| m.id).collect()
}

#[test]
fn twelve_members_make_three_teams_of_four() {
    let members = population(&["Sales"; 12]);
    let mut rng = SmallRng::seed_from_u64(3);
    let partition = partition_teams_with_rng(&members, 4, &GroupingCriteria::default(), true, 100, &mut rng).unwrap();

    assert_eq!(partition.teams.len(), 3);
    assert!(partition.teams.iter().all(|t| t.members.len() == 4));
    assert!(partition.remainder.is_empty());
    let assigned: HashSet<u64> = partition.teams.iter().flat_map(|t| t.members.iter().copied()).collect();
    assert_eq!(assigned, all_ids(&members));
}

#[test]
fn thirteenth_member_joins_the_last_team() {
    let members = population(&["Sales", "Finance", "Legal", "Engineering"].repeat(4)[..13]);
    let criteria = GroupingCriteria { diverse_departments: true, ..GroupingCriteria::default() };
    let mut rng = SmallRng::seed_from_u64(11);
    let partition = partition_teams_with_rng(&members, 4, &criteria, true, 100, &mut rng).unwrap();

    let sizes: Vec<usize> = partition.teams.iter().map(|t| t.members.len()).collect();
    assert_eq!(sizes, vec![4, 4, 5]);
    assert!(partition.remainder.is_empty());
    assert_eq!(partition.member_count(), 13);
}

#[test]
fn separate_policy_keeps_a_remainder_group() {
    let members = population(&["Sales"; 13]);
    let partitioner = TeamPartitioner::new(PartitionConfig {
        remainder_policy: RemainderPolicy::Separate,
        ..PartitionConfig::default()
    })
    .unwrap();
    let mut rng = SmallRng::seed_from_u64(5);
    let partition = partitioner.partition(&members, 4, &GroupingCriteria::default(), &mut rng).unwrap();

    assert!(partition.teams.iter().all(|t| t.members.len() == 4));
    assert_eq!(partition.teams.len(), 3);
    assert_eq!(partition.remainder.len(), 1);
}

#[test]
fn similar_departments_keeps_a_pure_team() {
    let departments = ["Sales", "Sales", "Finance", "Legal", "Sales", "Finance", "Legal", "Sales", "Sales", "Finance", "Legal", "Sales"];
    let members = population(&departments);
    let criteria = GroupingCriteria { similar_departments: true, ..GroupingCriteria::default() };

    for seed in 0..8 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let partition = partition_teams_with_rng(&members, 4, &criteria, true, 100, &mut rng).unwrap();
        let pure = partition.teams.iter().any(|team| {
            team.members.iter().all(|id| members[*id as usize - 1].department.as_deref() == Some("Sales"))
        });
        assert!(pure, "seed {seed}: {:?}", partition.teams);
    }
}

#[test]
fn similar_departments_keeps_synergy_units_apart() {
    let departments = [
        "Engineering", "Product", "Legal", "Product", "Engineering", "Legal",
        "Engineering", "Product", "Legal", "Engineering", "Product", "Legal",
    ];
    let members = population(&departments);
    let criteria = GroupingCriteria { similar_departments: true, ..GroupingCriteria::default() };

    for seed in 0..8 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let partition = partition_teams_with_rng(&members, 4, &criteria, true, 100, &mut rng).unwrap();
        assert_eq!(partition.teams.len(), 3);
        assert!(partition.teams.iter().all(|t| t.diversity.departments == 1), "seed {seed}: {:?}", partition.teams);
    }
}

#[test]
fn similar_departments_with_only_synergy_units() {
    let members = population(&["Engineering", "Product"].repeat(4));
    let criteria = GroupingCriteria { similar_departments: true, ..GroupingCriteria::default() };

    for seed in 0..8 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let partition = partition_teams_with_rng(&members, 4, &criteria, true, 100, &mut rng).unwrap();
        let pure = partition.teams.iter().filter(|t| t.diversity.departments == 1).count();
        assert_eq!(pure, 2, "seed {seed}: {:?}", partition.teams);
    }
}

#[test]
fn diverse_departments_spread_every_team() {
    let members = population(&["Sales", "Sales", "Finance", "Finance", "Legal", "Legal", "Support", "Support"]);
    let criteria = GroupingCriteria::from_ordered([Criterion::DiverseDepartments]);

    for seed in 0..8 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let partition = partition_teams_with_rng(&members, 4, &criteria, true, 100, &mut rng).unwrap();
        assert_eq!(partition.teams.len(), 2);
        assert!(partition.teams.iter().all(|t| t.diversity.departments >= 3), "seed {seed}: {:?}", partition.teams);
    }
}

#[test]
fn oversized_team_holds_everyone() {
    let members = population(&["Sales", "Finance", "Legal"]);
    let partition = partition_teams(&members, 5, &GroupingCriteria::default(), true, 100).unwrap();

    assert_eq!(partition.teams.len(), 1);
    assert_eq!(partition.teams[0].members.len(), 3);
    assert!(partition.remainder.is_empty());
}

#[test]
fn fixed_seed_reproduces_the_partition() {
    let members = population(&["Sales", "Finance", "Legal", "Engineering", "Product", "Design"].repeat(3));
    let criteria = GroupingCriteria {
        diverse_personalities: true,
        similar_locations: true,
        ..GroupingCriteria::default()
    };
    let first = partition_teams_with_rng(&members, 3, &criteria, true, 50, &mut SmallRng::seed_from_u64(99)).unwrap();
    let second = partition_teams_with_rng(&members, 3, &criteria, true, 50, &mut SmallRng::seed_from_u64(99)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn optimization_never_lowers_total_fit() {
    let members = population(&["Sales", "Finance", "Legal", "Engineering"].repeat(4));
    let criteria = GroupingCriteria { similar_departments: true, shared_interests: true, ..GroupingCriteria::default() };
    let total = |optimize: bool| -> f64 {
        let mut rng = SmallRng::seed_from_u64(21);
        let partition = partition_teams_with_rng(&members, 4, &criteria, optimize, 100, &mut rng).unwrap();
        partition.teams.iter().map(|t| t.average_fit).sum()
    };
    assert!(total(true) >= total(false) - 1e-12);
}

#[test]
fn rejects_invalid_requests() {
    let members = population(&["Sales"; 4]);
    assert!(matches!(
        partition_teams(&members, 0, &GroupingCriteria::default(), true, 100),
        Err(AffinityError::InvalidTeamSize { .. })
    ));
    assert!(matches!(
        partition_teams(&[], 4, &GroupingCriteria::default(), true, 100),
        Err(AffinityError::InvalidTeamSize { member_count: 0, .. })
    ));
    assert!(matches!(
        partition_teams(&members, 2, &GroupingCriteria::default(), true, 0),
        Err(AffinityError::InvalidConfig(_))
    ));
}
