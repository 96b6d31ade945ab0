use {
    gmm::{Config, Context, Generation, ResourceUsage},
    tracing_subscriber::layer::SubscriberExt as _,
};

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .pretty()
            .finish()
            .with(tracing_error::ErrorLayer::default()),
    )?;

    for &generation in Generation::ALL.iter() {
        let context = Context::new(Config::for_generation(generation))?;
        let policy = context.cache_policy();

        println!("{:?}", generation);

        for entry in policy.mocs_table() {
            println!(
                "    MOCS {:2}: LeCC {:#05x} L3 {:#05x}{}",
                entry.index,
                entry.lecc.value(),
                entry.l3.value(),
                if entry.special { " (special)" } else { "" },
            );
        }

        for entry in policy.pat_table() {
            println!(
                "    PAT {:2}: L3 {:?} L4 {:?} {:?}{}",
                entry.index,
                entry.l3,
                entry.l4,
                entry.coherency,
                if entry.compressed { " compressed" } else { "" },
            );
        }

        for &usage in ResourceUsage::ALL.iter() {
            let element = policy.policy(usage)?;
            println!(
                "    {:?}: {:?} age {} mocs {} pat {}",
                usage, element.flags, element.age, element.mocs, element.pat
            );
        }
    }

    Ok(())
}
