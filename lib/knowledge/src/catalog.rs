//! The built-in service table.

use crate::error::KnowledgeError;
use crate::service::{ServiceEntry, ServiceSummary};
use rand::Rng;
use rand::seq::SliceRandom;

const AWS_SERVICES: &[ServiceEntry] = &[
    ServiceEntry {
        id: "ec2",
        name: "Amazon EC2",
        description: "Virtual servers in the cloud",
        console: "EC2 Dashboard → Launch Instance → Select AMI → Choose Instance Type → Configure → Launch",
        cli: "aws ec2 run-instances --image-id ami-xxxxx --instance-type t2.micro",
        sdk: r#"boto3.client("ec2").run_instances(ImageId="ami-xxx", InstanceType="t2.micro")"#,
        troubleshooting: &[
            "Check IAM permissions",
            "Verify security groups",
            "Check instance state",
            "Review VPC settings",
        ],
        subtopics: &[
            "launch",
            "security groups",
            "key pairs",
            "AMI",
            "instance types",
            "pricing",
        ],
    },
    ServiceEntry {
        id: "s3",
        name: "Amazon S3",
        description: "Object storage service",
        console: "S3 Dashboard → Create Bucket → Enter name → Select region → Create",
        cli: "aws s3 mb s3://bucket-name && aws s3 cp file.txt s3://bucket-name/",
        sdk: r#"boto3.client("s3").create_bucket(Bucket="bucket-name")"#,
        troubleshooting: &[
            "Check bucket policies",
            "Verify IAM permissions",
            "Check region settings",
            "Review CORS configuration",
        ],
        subtopics: &[
            "buckets",
            "storage classes",
            "lifecycle policies",
            "versioning",
            "encryption",
            "static hosting",
        ],
    },
    ServiceEntry {
        id: "lambda",
        name: "AWS Lambda",
        description: "Serverless compute service",
        console: "Lambda Dashboard → Create Function → Select runtime → Write code → Test",
        cli: "aws lambda create-function --function-name myFunc --runtime python3.9 --role arn:aws:iam::role",
        sdk: r#"boto3.client("lambda").create_function(FunctionName="myFunc", Runtime="python3.9")"#,
        troubleshooting: &[
            "Check CloudWatch logs",
            "Verify execution role",
            "Check timeout settings",
            "Review memory allocation",
        ],
        subtopics: &[
            "triggers",
            "layers",
            "environment variables",
            "cold starts",
            "pricing",
            "limits",
        ],
    },
    ServiceEntry {
        id: "iam",
        name: "AWS IAM",
        description: "Identity and Access Management",
        console: "IAM Dashboard → Users/Roles → Create → Attach policies → Review",
        cli: "aws iam create-user --user-name myuser && aws iam attach-user-policy",
        sdk: r#"boto3.client("iam").create_user(UserName="myuser")"#,
        troubleshooting: &[
            "Check policy syntax",
            "Verify permissions",
            "Check trust relationships",
            "Review MFA settings",
        ],
        subtopics: &[
            "users",
            "roles",
            "policies",
            "groups",
            "MFA",
            "access keys",
            "federation",
        ],
    },
    ServiceEntry {
        id: "vpc",
        name: "Amazon VPC",
        description: "Virtual Private Cloud",
        console: "VPC Dashboard → Create VPC → Configure subnets → Set up routing",
        cli: "aws ec2 create-vpc --cidr-block 10.0.0.0/16",
        sdk: r#"boto3.client("ec2").create_vpc(CidrBlock="10.0.0.0/16")"#,
        troubleshooting: &[
            "Check route tables",
            "Verify NACL rules",
            "Check internet gateway",
            "Review peering connections",
        ],
        subtopics: &[
            "subnets",
            "route tables",
            "internet gateway",
            "NAT gateway",
            "VPC peering",
            "endpoints",
        ],
    },
    ServiceEntry {
        id: "rds",
        name: "Amazon RDS",
        description: "Relational Database Service",
        console: "RDS Dashboard → Create Database → Choose engine → Configure → Launch",
        cli: "aws rds create-db-instance --db-instance-identifier mydb --db-instance-class db.t3.micro",
        sdk: r#"boto3.client("rds").create_db_instance(DBInstanceIdentifier="mydb")"#,
        troubleshooting: &[
            "Check security groups",
            "Verify subnet groups",
            "Check parameter groups",
            "Review backup settings",
        ],
        subtopics: &[
            "engines",
            "multi-az",
            "read replicas",
            "backups",
            "encryption",
            "performance insights",
        ],
    },
    ServiceEntry {
        id: "cloudwatch",
        name: "Amazon CloudWatch",
        description: "Monitoring and observability service",
        console: "CloudWatch Dashboard → Create Dashboard → Add widgets → Configure metrics",
        cli: r#"aws cloudwatch put-metric-data --namespace "MyApp" --metric-data"#,
        sdk: r#"boto3.client("cloudwatch").put_metric_data(Namespace="MyApp")"#,
        troubleshooting: &[
            "Check metric filters",
            "Verify alarm thresholds",
            "Review log groups",
            "Check retention policies",
        ],
        subtopics: &["metrics", "alarms", "logs", "dashboards", "events", "insights"],
    },
];

/// Read-only lookup table of supported services.
///
/// Iteration order is the declared order of the table and is relied on for
/// deterministic listings and detector tie-breaks.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: &'static [ServiceEntry],
}

impl KnowledgeBase {
    /// Returns the built-in AWS service table.
    #[must_use]
    pub fn aws() -> Self {
        Self {
            entries: AWS_SERVICES,
        }
    }

    /// Looks up a service by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&'static ServiceEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Looks up a service, failing if it is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`KnowledgeError::UnknownService`] if `id` is not in the table.
    pub fn require(&self, id: &str) -> cloudbuddy_core::Result<&'static ServiceEntry, KnowledgeError> {
        self.get(id).ok_or_else(|| {
            KnowledgeError::UnknownService {
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Returns true if `id` names a known service.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Returns all entries in declared order.
    #[must_use]
    pub fn entries(&self) -> &'static [ServiceEntry] {
        self.entries
    }

    /// Returns all identifiers in declared order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.id)
    }

    /// Returns listing summaries in declared order.
    #[must_use]
    pub fn summaries(&self) -> Vec<ServiceSummary> {
        self.entries.iter().map(ServiceEntry::summary).collect()
    }

    /// Picks a service uniformly at random.
    pub fn random_id<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&'static str> {
        self.entries.choose(rng).map(|entry| entry.id)
    }

    /// Returns the number of services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no services.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::aws()
    }
}
