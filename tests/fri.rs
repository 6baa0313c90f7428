#[cfg(test)]
mod tests {
    use stark_fri::field::FieldElement;
    use stark_fri::math::domain::{coset, fold_domain};
    use stark_fri::math::fri::{commit_fri, decommit_fri, next_fri_layer, next_fri_polynomial};
    use stark_fri::math::polynomial::Polynomial;
    use stark_fri::merkle::MerkleTree;
    use stark_fri::StarkError;

    fn poly(coeffs: &[u64]) -> Polynomial {
        Polynomial::new(coeffs.iter().map(|&c| FieldElement::new(c)).collect())
    }

    fn random_poly(degree: usize) -> Polynomial {
        let mut rng = rand::thread_rng();
        let coeffs = (0..=degree)
            .map(|_| FieldElement::new(rand::Rng::gen_range(&mut rng, 0..FieldElement::MODULUS)))
            .collect();
        Polynomial::new(coeffs)
    }

    fn committed_layers(
        p: Polynomial,
        domain_size: usize,
        betas: &[u64],
    ) -> Result<(stark_fri::math::fri::FriLayers, stark_fri::proof::FriCommitment), StarkError>
    {
        let domain = coset(domain_size).unwrap();
        let eval: Vec<FieldElement> = domain.iter().map(|&x| p.eval(x)).collect();
        let merkle = MerkleTree::new(&eval).unwrap();
        commit_fri(p, domain, eval, merkle, betas)
    }

    #[test]
    fn test_folding_halves_degree() {
        let p = random_poly(15);
        let beta = FieldElement::new(123456789);
        let folded = next_fri_polynomial(&p, beta);
        assert_eq!(folded.degree(), Some(7));

        let twice = next_fri_polynomial(&folded, beta);
        assert_eq!(twice.degree(), Some(3));
    }

    #[test]
    fn test_folded_evaluations_satisfy_fold_equation() {
        let p = random_poly(15);
        let beta = FieldElement::new(98765);
        let domain = coset(64).unwrap();
        let (next_poly, next_domain, next_eval) = next_fri_layer(&p, &domain, beta);

        assert_eq!(next_domain, fold_domain(&domain));
        let two = FieldElement::new(2);
        for (i, &x) in domain[..32].iter().enumerate() {
            // f_next(x^2) = (f(x) + f(-x)) / 2 + beta * (f(x) - f(-x)) / (2x)
            let a = p.eval(x);
            let b = p.eval(-x);
            let expected = (a + b).divide(two).unwrap()
                + beta * (a - b).divide(two * x).unwrap();
            assert_eq!(next_eval[i], expected);
            assert_eq!(next_poly.eval(x * x), expected);
        }
    }

    #[test]
    fn test_commit_terminates_within_log_layers() {
        // Degree 15 over 128 points: 4 folds bring the degree to 0, well
        // within log2(128) = 7.
        let betas: Vec<u64> = (1..=7).collect();
        let (layers, commitment) = committed_layers(random_poly(15), 128, &betas).unwrap();

        assert_eq!(commitment.folding_poly_coeffs, vec![1, 2, 3, 4]);
        assert_eq!(commitment.layer_roots.len(), 5);
        assert_eq!(layers.num_layers(), 5);
        assert_eq!(layers.polys[4].degree().unwrap_or(0), 0);
        assert_eq!(layers.evals[4].len(), 8);

        // Every remaining evaluation is the committed constant.
        let constant: FieldElement = commitment.final_constant.parse().unwrap();
        assert!(layers.evals[4].iter().all(|&v| v == constant));
    }

    #[test]
    fn test_commit_fails_without_enough_betas() {
        let result = committed_layers(random_poly(15), 128, &[1, 2]);
        assert!(matches!(
            result,
            Err(StarkError::NotEnoughFoldingCoefficients { consumed: 2 })
        ));
    }

    #[test]
    fn test_constant_polynomial_needs_no_folding() {
        let (layers, commitment) = committed_layers(poly(&[42]), 128, &[]).unwrap();
        assert_eq!(layers.num_layers(), 1);
        assert_eq!(commitment.layer_roots.len(), 1);
        assert_eq!(commitment.final_constant, "42");
    }

    #[test]
    fn test_query_must_leave_room_for_shift() {
        let p = random_poly(15);
        let domain = coset(128).unwrap();
        let f_eval: Vec<FieldElement> = domain.iter().map(|&x| p.eval(x)).collect();
        let f_merkle = MerkleTree::new(&f_eval).unwrap();
        let (layers, _) = committed_layers(p, 128, &[1, 2, 3, 4]).unwrap();

        // blowup 8: the g^2 shift reads idx + 16.
        let ok = decommit_fri(&f_eval, &f_merkle, &layers, &[111], 1, 8);
        assert!(ok.is_ok());

        let out_of_range = decommit_fri(&f_eval, &f_merkle, &layers, &[112], 1, 8);
        assert!(matches!(
            out_of_range,
            Err(StarkError::IndexOutOfRange { index: 112, len: 128 })
        ));
    }

    #[test]
    fn test_decommitment_indices_cascade() {
        let (layers, _) = committed_layers(random_poly(15), 128, &[5, 6, 7, 8]).unwrap();
        let p2 = random_poly(15);
        let domain = coset(128).unwrap();
        let f_eval: Vec<FieldElement> = domain.iter().map(|&x| p2.eval(x)).collect();
        let f_merkle = MerkleTree::new(&f_eval).unwrap();

        let decommitments = decommit_fri(&f_eval, &f_merkle, &layers, &[100], 1, 8).unwrap();
        let query = &decommitments.queries[0];

        // idx 100 reduces mod 128, 64, 32, 16 across the four open layers.
        assert_eq!(query.fri_layers["layer_0"].idx, 100);
        assert_eq!(query.fri_layers["layer_1"].idx, 36);
        assert_eq!(query.fri_layers["layer_2"].idx, 4);
        assert_eq!(query.fri_layers["layer_3"].idx, 4);
        assert_eq!(query.fri_layers.len(), 4);
    }
}
