use querypath_core::{
    Command, CommandFn, ContextRepository, InMemoryContext, Query, QueryFn, Repository,
    ScalarFn,
};
use std::convert::Infallible;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Customer {
    name: String,
    active: bool,
}

impl Customer {
    fn new(name: &str, active: bool) -> Self {
        Self {
            name: name.to_string(),
            active,
        }
    }
}

struct AddCustomer(Customer);

impl Command<InMemoryContext> for AddCustomer {
    type Error = Infallible;

    fn execute(&self, context: &InMemoryContext) -> Result<(), Infallible> {
        context.add(self.0.clone());
        Ok(())
    }
}

struct ActiveCustomers;

impl Query<InMemoryContext> for ActiveCustomers {
    type Entity = Customer;
    type Error = Infallible;
    type Iter<'ctx> = std::iter::Filter<std::vec::IntoIter<Customer>, fn(&Customer) -> bool>;

    fn execute<'ctx>(
        &'ctx self,
        context: &'ctx InMemoryContext,
    ) -> Result<Self::Iter<'ctx>, Infallible> {
        let is_active: fn(&Customer) -> bool = |customer| customer.active;
        Ok(context.all::<Customer>().into_iter().filter(is_active))
    }
}

#[test]
fn commands_and_queries_share_the_held_context() {
    let context = InMemoryContext::new();
    let repo = ContextRepository::new(&context);

    repo.execute(&AddCustomer(Customer::new("ada", true))).unwrap();
    repo.execute(&AddCustomer(Customer::new("bob", false))).unwrap();
    repo.execute(&AddCustomer(Customer::new("cy", true))).unwrap();

    let names: Vec<String> = repo
        .find(&ActiveCustomers)
        .unwrap()
        .map(|customer| customer.name)
        .collect();
    assert_eq!(names, vec!["ada", "cy"]);
    assert_eq!(context.count::<Customer>(), 3);
}

#[test]
fn same_command_applies_again_on_every_execute() {
    let context = InMemoryContext::new();
    let repo = ContextRepository::new(&context);
    let add = AddCustomer(Customer::new("dup", true));

    repo.execute(&add).unwrap();
    repo.execute(&add).unwrap();

    let count = ScalarFn::new(|ctx: &InMemoryContext| Ok::<_, Infallible>(ctx.count::<Customer>()));
    assert_eq!(repo.get(&count), Ok(2));
}

#[test]
fn closure_objects_run_against_in_memory_context() {
    let context = InMemoryContext::new();
    let repo = ContextRepository::new(&context);
    for value in [4_u32, 8, 15, 16, 23, 42] {
        context.add(value);
    }

    let drop_odd = CommandFn::new(|ctx: &InMemoryContext| {
        ctx.remove_where(|value: &u32| value % 2 == 1);
        Ok::<_, Infallible>(())
    });
    repo.execute(&drop_odd).unwrap();

    let evens = QueryFn::new(|ctx: &InMemoryContext| Ok::<_, Infallible>(ctx.all::<u32>()));
    assert_eq!(
        repo.find(&evens).unwrap().collect::<Vec<_>>(),
        vec![4, 8, 16, 42]
    );
}
