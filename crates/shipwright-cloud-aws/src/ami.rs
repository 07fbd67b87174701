//! ECS-optimized AMIs by region
//!
//! Used as the default image for launch configurations when none is given.
//! For the current list see
//! http://docs.aws.amazon.com/AmazonECS/latest/developerguide/launch_container_instance.html

const ECS_OPTIMIZED_AMIS: &[(&str, &str)] = &[
    ("us-east-1", "ami-ddc7b6b7"),
    ("us-west-1", "ami-a39df1c3"),
    ("us-west-2", "ami-d74357b6"),
    ("eu-west-1", "ami-f1b46b82"),
    ("ap-northeast-1", "ami-3077525e"),
    ("ap-southeast-1", "ami-21ae6942"),
    ("ap-southeast-2", "ami-23b4eb40"),
];

/// Default ECS-optimized AMI for `region`, if one is known
pub fn ecs_optimized_ami(region: &str) -> Option<&'static str> {
    ECS_OPTIMIZED_AMIS
        .iter()
        .find(|(r, _)| *r == region)
        .map(|(_, ami)| *ami)
}
