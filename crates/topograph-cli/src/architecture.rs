//! The reference AWS EKS architecture.
//!
//! Users reach an EKS cluster through an internet gateway and an application
//! load balancer. Worker nodes are spread over three availability zones, each
//! with a public subnet, a NAT gateway and a private subnet.

use topograph::{
    DiagramBuilder, GraphSession, NodeRef, TopographError,
    semantic::{Direction, GraphDescription},
};

pub const TITLE: &str = "AWS EKS Kubernetes Terraform Architecture";

pub const DIRECTION: Direction = Direction::TopToBottom;

/// Nodes declared inside one availability zone.
struct Zone {
    public: NodeRef,
    nat: NodeRef,
    private: NodeRef,
    workers: NodeRef,
}

/// Declares the zone cluster for `suffix` (`a`, `b` or `c`), numbered `index`.
fn zone(session: &mut GraphSession<'_>, suffix: char, index: u8) -> Result<Zone, TopographError> {
    let upper = suffix.to_ascii_uppercase();
    let mut cluster = session.begin_cluster_with_id(
        format!("az_{suffix}").as_str(),
        format!("Availability Zone {upper}"),
    )?;

    Ok(Zone {
        public: cluster.add_node(
            format!("pub_{suffix}").as_str(),
            format!("Public\n10.0.10{index}.0/24"),
            "aws.network",
        )?,
        private: cluster.add_node(
            format!("prv_{suffix}").as_str(),
            format!("Private\n10.0.{index}.0/24"),
            "aws.network",
        )?,
        nat: cluster.add_node(
            format!("nat_{suffix}").as_str(),
            format!("NAT-{upper}"),
            "aws.network",
        )?,
        workers: cluster.add_node(format!("nodes_{suffix}").as_str(), "EKS Nodes", "aws.compute")?,
    })
}

/// Builds the architecture graph with `builder`.
///
/// # Errors
///
/// Returns [`TopographError::State`] if `builder` already has an open
/// session.
pub fn build(builder: &DiagramBuilder) -> Result<GraphDescription, TopographError> {
    let mut session = builder.begin_graph(TITLE, DIRECTION)?;

    let users = session.add_node("users", "Users", "onprem.client")?;

    let mut account = session.begin_cluster_with_id("account", "AWS Account")?;
    let igw = account.add_node("igw", "Internet Gateway", "aws.network")?;

    let mut vpc = account.begin_cluster_with_id("vpc", "VPC (10.0.0.0/16)")?;
    let zones = [zone(&mut vpc, 'a', 1)?, zone(&mut vpc, 'b', 2)?, zone(&mut vpc, 'c', 3)?];
    let alb = vpc.add_node("alb", "Application\nLoad Balancer", "aws.network")?;
    let eks = {
        let mut plane = vpc.begin_cluster_with_id("control_plane", "EKS Control Plane")?;
        plane.add_node("eks", "EKS Cluster", "aws.compute")?
    };
    let (pods, svc) = {
        let mut workloads = vpc.begin_cluster_with_id("workloads", "Kubernetes Workloads")?;
        let pods = workloads.add_node("pods", "Application Pods", "k8s.compute")?;
        let svc = workloads.add_node("svc", "Services", "k8s.network")?;
        (pods, svc)
    };
    vpc.close()?;

    let (iam, cw, ebs) = {
        let mut security = account.begin_cluster_with_id("security", "Security & Monitoring")?;
        let iam = security.add_node("iam", "IAM Roles\n& Policies", "aws.security")?;
        let cw = security.add_node("cw", "CloudWatch\nLogs & Metrics", "aws.management")?;
        let ebs = security.add_node("ebs", "Encrypted\nEBS Volumes", "aws.storage")?;
        (iam, cw, ebs)
    };
    account.close()?;

    let workers = zones.each_ref().map(|zone| zone.workers);

    session.add_chain([users, igw, alb], None)?;
    session.add_edge([alb], workers, None)?;

    session.add_edge([igw], zones.each_ref().map(|zone| zone.public), None)?;
    for zone in &zones {
        session.add_chain([zone.public, zone.nat, zone.private, zone.workers], None)?;
    }

    session.add_edge(workers, [eks], None)?;
    session.add_chain([eks, pods, svc], None)?;

    session.add_edge(workers, [iam], None)?;
    session.add_edge([eks].into_iter().chain(workers), [cw], None)?;
    session.add_edge(workers, [ebs], None)?;

    session.end_graph()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use topograph::{Export, ExportFormat, export, identifier::Id, semantic::Child};

    use super::*;

    fn graph() -> GraphDescription {
        build(&DiagramBuilder::default()).unwrap()
    }

    #[test]
    fn test_counts() {
        let graph = graph();

        assert_eq!(graph.title(), TITLE);
        assert_eq!(graph.direction(), Direction::TopToBottom);
        assert_eq!(graph.nodes_count(), 21);
        assert_eq!(graph.edges().len(), 19);

        let Export::AdjacencyList(records) = export(&graph, ExportFormat::AdjacencyList) else {
            panic!("Expected adjacency list");
        };
        assert_eq!(records.len(), 32);
    }

    #[test]
    fn test_root_layout() {
        let graph = graph();
        let children = graph.children();

        assert_eq!(children.len(), 2);
        assert!(matches!(&children[0], Child::Node(node) if node.id() == "users"));
        let Child::Cluster(account) = &children[1] else {
            panic!("Expected account cluster");
        };
        assert_eq!(account.label(), "AWS Account");

        let labels: Vec<&str> = account.children().iter().map(Child::label).collect();
        assert_eq!(labels, ["Internet Gateway", "VPC (10.0.0.0/16)", "Security & Monitoring"]);
    }

    #[test]
    fn test_worker_paths() {
        let graph = graph();
        let paths = graph.node_paths();

        let workers: HashSet<String> = ["nodes_a", "nodes_b", "nodes_c"]
            .into_iter()
            .map(|id| paths[&Id::new(id)].to_string())
            .collect();
        assert_eq!(
            workers,
            HashSet::from([
                "account::vpc::az_a::nodes_a".to_string(),
                "account::vpc::az_b::nodes_b".to_string(),
                "account::vpc::az_c::nodes_c".to_string(),
            ])
        );
    }

    #[test]
    fn test_every_worker_reaches_control_plane_and_monitoring() {
        let graph = graph();
        let Export::AdjacencyList(records) = export(&graph, ExportFormat::AdjacencyList) else {
            panic!("Expected adjacency list");
        };

        let monitored: HashSet<&str> = records
            .iter()
            .filter(|r| r.to().ends_with("::cw"))
            .map(|r| r.from())
            .collect();
        assert_eq!(monitored.len(), 4);
        assert!(monitored.contains("account::vpc::control_plane::eks"));

        let to_eks = records
            .iter()
            .filter(|r| r.to().ends_with("::eks") && r.from().contains("nodes_"))
            .count();
        assert_eq!(to_eks, 3);
    }

    #[test]
    fn test_builder_is_released() {
        let builder = DiagramBuilder::default();
        build(&builder).unwrap();

        assert!(!builder.is_session_open());
        assert!(build(&builder).is_ok());
    }
}
