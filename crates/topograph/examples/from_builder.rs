//! Example: Building a graph and printing its structural exports
//!
//! Builds a small ingress path and prints both the adjacency list and the
//! cluster tree as JSON, without invoking any image renderer.

use topograph::{DiagramBuilder, ExportFormat, export, semantic::Direction};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let builder = DiagramBuilder::default();
    let mut session = builder.begin_graph("Ingress Path", Direction::LeftToRight)?;

    let users = session.add_node("users", "Users", "onprem.client")?;
    let (igw, alb, pods) = {
        let mut account = session.begin_cluster_with_id("account", "AWS Account")?;
        let igw = account.add_node("igw", "Internet Gateway", "aws.network")?;

        let mut vpc = account.begin_cluster_with_id("vpc", "VPC (10.0.0.0/16)")?;
        let alb = vpc.add_node("alb", "Application\nLoad Balancer", "aws.network")?;
        let pods = {
            let mut workloads = vpc.begin_cluster("Kubernetes Workloads")?;
            workloads.add_node("pods", "Application Pods", "k8s.compute")?
        };
        (igw, alb, pods)
    };

    session.add_chain([users, igw, alb], None)?;
    session.add_edge([alb], [pods], Some("http"))?;
    let graph = session.end_graph()?;

    for format in [ExportFormat::AdjacencyList, ExportFormat::Tree] {
        println!("# {format}");
        println!("{}", serde_json::to_string_pretty(&export(&graph, format))?);
    }

    Ok(())
}
