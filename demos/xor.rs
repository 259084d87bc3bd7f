use ferrite_train::{
    run, ActivationFunction, InMemoryDataset, LayerSpec, LossType, Model, Network, NetworkSpec,
    Sgd, TrainConfig,
};

fn main() -> ferrite_train::Result<()> {
    env_logger::init();

    let spec = NetworkSpec {
        name: "xor".into(),
        layers: vec![
            LayerSpec { size: 4, input_size: 2, activation: ActivationFunction::Tanh },
            LayerSpec { size: 1, input_size: 4, activation: ActivationFunction::Sigmoid },
        ],
        loss: LossType::Mse,
    };
    let mut network = Network::from_spec(&spec, 42)?;

    let inputs = vec![
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
        vec![0.0, 0.0],
    ];
    let expected_outputs = vec![vec![1.0], vec![0.0], vec![1.0], vec![0.0]];
    let mut dataset = InMemoryDataset::from_rows(&inputs, &expected_outputs)?;

    let mut optimizer = Sgd::new(0.5)?;
    let config = TrainConfig::new(5000, 4, 500);
    let loss_fn = spec.loss.build();

    for d in run(&mut network, &loss_fn, &mut optimizer, &mut dataset, &config)? {
        println!("Epoch {}: loss = {:.6}", d.epoch, d.average_loss);
    }

    let out = network.forward(dataset.inputs())?;
    for (input, y) in inputs.iter().zip(out.as_slice()) {
        println!("Input: {:?} -> Output: {:.4}", input, y);
    }
    Ok(())
}
