use crate::structs::OrderMode;
use crate::tree::TreeNode;

/// Siblings sorted by case-insensitive label. The sort is stable, so labels
/// equal after lower-casing keep their insertion order.
pub fn order_children<'a, I>(children: I, order: OrderMode) -> Vec<&'a TreeNode>
where
    I: IntoIterator<Item = &'a TreeNode>,
{
    let mut data: Vec<&TreeNode> = children.into_iter().collect();

    data.sort_by(|a, b| {
        let a_val = a.label.to_lowercase();
        let b_val = b.label.to_lowercase();
        match order {
            OrderMode::Asc => a_val.cmp(&b_val),
            OrderMode::Desc => b_val.cmp(&a_val),
        }
    });

    data
}
