/// Anything that can be listed as one row of the policy justification table.
///
/// Accessors never fail: a field that was never set renders as its default
/// (`Allow`, `*`) or as an empty cell.
pub trait Row {
    /// The statement effect, e.g. `Allow`
    fn effect_column(&self) -> String;

    /// The permission (IAM action), e.g. `s3:GetObject`
    fn permission_column(&self) -> String;

    /// The resource the permission applies to
    fn resource_column(&self) -> String;

    /// Why the permission is needed, empty by default
    fn reason_column(&self) -> String {
        String::new()
    }

    /// The serialized condition, empty by default
    fn condition_column(&self) -> String {
        String::new()
    }

    /// All columns, in table order.
    fn columns(&self) -> [String; 5] {
        [
            self.effect_column(),
            self.permission_column(),
            self.resource_column(),
            self.reason_column(),
            self.condition_column(),
        ]
    }
}
